//! Interactive prompts for values not given on the command line or in a
//! config file.
//!
//! Invalid answers are reported and asked again; only the end of input
//! aborts.

use anyhow::{bail, Result};
use std::io::{BufRead, Write};

use mqprep::condition::{ConditionError, ConditionMode, Conditions, RatioSelection};
use mqprep::pipeline::{PipelineError, Thresholds};

/// Question/answer loop over any line-based input and output
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("Input ended while waiting for an answer to: {}", question.trim());
        }
        Ok(line.trim().to_string())
    }

    fn complain(&mut self, message: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Ask whether experiments come with controls
    pub fn mode(&mut self) -> Result<ConditionMode> {
        writeln!(self.output, "\nSelect analysis type:")?;
        writeln!(self.output, "1: Experiments with corresponding controls")?;
        writeln!(self.output, "2: Experiments without controls")?;
        loop {
            match self.ask("Enter your choice (1 or 2): ")?.as_str() {
                "1" => return Ok(ConditionMode::Paired),
                "2" => return Ok(ConditionMode::Unpaired),
                _ => self.complain("Invalid choice. Please enter 1 or 2.")?,
            }
        }
    }

    /// Read conditions until the user types `done`
    pub fn conditions(&mut self, mode: ConditionMode) -> Result<Conditions> {
        loop {
            match mode {
                ConditionMode::Paired => {
                    writeln!(self.output, "\nEnter experiment/control pairs (type 'done' to finish):")?
                }
                ConditionMode::Unpaired => {
                    writeln!(self.output, "\nEnter experiment names (type 'done' to finish):")?
                }
            }

            let mut pairs = Vec::new();
            loop {
                let experiment = self.ask("Enter experiment name (or type 'done' to finish): ")?;
                if experiment.eq_ignore_ascii_case("done") {
                    break;
                }
                let control = match mode {
                    ConditionMode::Paired => {
                        Some(self.ask(&format!("Enter control name for {}: ", experiment))?)
                    }
                    ConditionMode::Unpaired => None,
                };
                pairs.push((experiment, control));
            }

            let conditions = match mode {
                ConditionMode::Paired => Conditions::paired(
                    pairs
                        .into_iter()
                        .map(|(e, c)| (e, c.unwrap_or_default())),
                ),
                ConditionMode::Unpaired => Conditions::unpaired(pairs.into_iter().map(|(e, _)| e)),
            };
            match conditions {
                Ok(conditions) => return Ok(conditions),
                Err(err) => self.complain(format!("{}. Please start again.", err))?,
            }
        }
    }

    /// Ask for whichever thresholds are not already known
    ///
    /// Values passed in are checked on their own first and fail immediately;
    /// only answers typed at the prompt are asked again.
    pub fn thresholds(&mut self, pep_max: Option<f64>, msms_min: Option<f64>) -> Result<Thresholds> {
        if let Some(pep) = pep_max {
            Thresholds::new(pep, 0.0)?;
        }
        if let Some(msms) = msms_min {
            Thresholds::new(0.0, msms)?;
        }

        loop {
            let pep = match pep_max {
                Some(v) => v.to_string(),
                None => self.ask("Enter PEP upper threshold (e.g. 0.05): ")?,
            };
            let msms = match msms_min {
                Some(v) => v.to_string(),
                None => self.ask("Enter MS/MS count lower threshold (e.g. 2): ")?,
            };
            match Thresholds::parse(&pep, &msms) {
                Ok(thresholds) => return Ok(thresholds),
                Err(err @ PipelineError::InvalidThreshold(_)) => self.complain(err)?,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Show every `i/j` option and read the selection
    pub fn ratio(&mut self, conditions: &Conditions) -> Result<RatioSelection> {
        let names: Vec<&str> = conditions.names().collect();
        writeln!(self.output, "\nSelect how Log2 fold change should be calculated:")?;
        writeln!(self.output, "Options:")?;
        for option in RatioSelection::options(names.len()) {
            writeln!(
                self.output,
                "  {} ( {} / {} )",
                option, names[option.numerator], names[option.denominator]
            )?;
        }

        loop {
            let answer = self.ask("Enter your choice (e.g., 1/2 or 2/1): ")?;
            let selection = answer
                .parse::<RatioSelection>()
                .and_then(|s| s.validate(names.len()).map(|_| s));
            match selection {
                Ok(selection) => return Ok(selection),
                Err(err @ ConditionError::InvalidSelection(_)) => self.complain(err)?,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_paired_conditions() {
        let mut p = prompter("Drug\nDMSO\nKO\nWT\ndone\n");
        let conditions = p.conditions(ConditionMode::Paired).unwrap();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions.specs()[1].control(), Some("WT"));
    }

    #[test]
    fn test_duplicate_conditions_reprompt() {
        let mut p = prompter("A\nA\ndone\nA\nB\nDONE\n");
        let conditions = p.conditions(ConditionMode::Unpaired).unwrap();
        assert_eq!(conditions.names().collect::<Vec<_>>(), vec!["A", "B"]);
        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("Duplicate condition: A"));
    }

    #[test]
    fn test_mode_reprompts_on_invalid_choice() {
        let mut p = prompter("3\n2\n");
        assert_eq!(p.mode().unwrap(), ConditionMode::Unpaired);
    }

    #[test]
    fn test_thresholds_reprompt() {
        let mut p = prompter("abc\n2\n5\n2\n0.05\n2\n");
        let thresholds = p.thresholds(None, None).unwrap();
        assert_eq!(thresholds.pep_max(), 0.05);
        assert_eq!(thresholds.msms_min(), 2.0);
        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("'abc' is not a number"));
        assert!(shown.contains("must be between 0 and 1"));
    }

    #[test]
    fn test_invalid_given_threshold_fails_without_prompting() {
        let mut p = prompter("2\n3\n4\n5\n");
        let err = p.thresholds(Some(5.0), None).unwrap_err();
        assert!(err.to_string().contains("PEP upper threshold"));
        assert!(p.output.is_empty());

        let mut p = prompter("0.05\n");
        assert!(p.thresholds(None, Some(-1.0)).is_err());
        assert!(p.output.is_empty());
    }

    #[test]
    fn test_thresholds_partially_known() {
        let mut p = prompter("3\n");
        let thresholds = p.thresholds(Some(0.01), None).unwrap();
        assert_eq!(thresholds.msms_min(), 3.0);

        let mut p = prompter("");
        assert!(p.thresholds(Some(2.0), Some(1.0)).is_err());
    }

    #[test]
    fn test_ratio_menu() {
        let conditions = Conditions::unpaired(["A", "B"]).unwrap();
        let mut p = prompter("1/1\n2/1\n");
        let selection = p.ratio(&conditions).unwrap();
        assert_eq!(selection, RatioSelection::new(1, 0));
        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("1/2 ( A / B )"));
        assert!(shown.contains("2/1 ( B / A )"));
    }

    #[test]
    fn test_end_of_input_aborts() {
        let mut p = prompter("A\n");
        assert!(p.conditions(ConditionMode::Unpaired).is_err());
    }
}
