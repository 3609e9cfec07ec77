//! Application shell: option parsing and the run loop.

use crate::error::AppResult;
use crate::script::{Script, Step};
use crate::text_backend::TextFactory;
use clap::Parser;
use eqbalance_core::{Equation, EquationConfig};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Command line options.
#[derive(Debug, Clone, Default, PartialEq, Parser)]
#[command(
    name = "eqbalance",
    about = "Drag terms across an equation from a scripted session",
    version
)]
pub struct AppOptions {
    /// JSON equation config. Defaults apply when absent.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON gesture script. Without one the app prints a fresh equation.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Overrides the config seed.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Load and validate an equation config file.
pub fn load_config(path: &Path) -> AppResult<EquationConfig> {
    let json = std::fs::read_to_string(path)?;
    let config = EquationConfig::from_json(&json)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// The running application.
pub struct App {
    equation: Equation,
    factory: TextFactory,
}

impl App {
    pub fn new(options: &AppOptions) -> AppResult<Self> {
        let mut config = match &options.config {
            Some(path) => load_config(path)?,
            None => EquationConfig::default(),
        };
        if options.seed.is_some() {
            config.seed = options.seed;
        }
        let factory = TextFactory::new();
        let equation = Equation::new(Box::new(factory.clone()), config)?;
        Ok(Self { equation, factory })
    }

    pub fn equation(&self) -> &Equation {
        &self.equation
    }

    /// Spawn an equation, run the script if there is one, and write the
    /// drawn equation to `out`.
    pub fn run(&mut self, options: &AppOptions, out: &mut impl Write) -> AppResult<()> {
        let script = match &options.script {
            Some(path) => Script::from_json(&std::fs::read_to_string(path)?)?,
            None => Script::default(),
        };
        self.run_script(&script, out)
    }

    pub fn run_script(&mut self, script: &Script, out: &mut impl Write) -> AppResult<()> {
        match &script.equation {
            Some(spec) => self.equation.spawn_spec(spec),
            None => {
                let config = self.equation.config().clone();
                self.equation.spawn_equation(&config)?;
            }
        }

        let factory = &self.factory;
        script.run(&mut self.equation, |_| draw(factory, out))?;
        if !script.steps.contains(&Step::Print) {
            draw(factory, out)?;
        }
        log::info!("Final equation: {}", self.equation);
        Ok(())
    }
}

fn draw(factory: &TextFactory, out: &mut impl Write) -> AppResult<()> {
    for row in factory.render() {
        writeln!(out, "{row}")?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use eqbalance_core::{EquationSpec, Fraction, Side, TermSpec};
    use std::io::Write as _;

    #[test]
    fn test_parse_options() {
        let options =
            AppOptions::try_parse_from(["eqbalance", "--config", "eq.json", "--seed", "42"]).unwrap();
        assert_eq!(options.config, Some(PathBuf::from("eq.json")));
        assert_eq!(options.script, None);
        assert_eq!(options.seed, Some(42));

        let defaults = AppOptions::try_parse_from(["eqbalance"]).unwrap();
        assert_eq!(defaults, AppOptions::default());
    }

    #[test]
    fn test_parse_options_errors() {
        assert!(AppOptions::try_parse_from(["eqbalance", "--script"]).is_err());
        assert!(AppOptions::try_parse_from(["eqbalance", "--seed", "x"]).is_err());
        assert!(AppOptions::try_parse_from(["eqbalance", "--fast"]).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_total_terms": 5, "seed": 7 }}"#).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.max_total_terms, 5);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_load_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_total_terms": 1 }}"#).unwrap();

        assert!(matches!(load_config(file.path()), Err(AppError::Config(_))));
    }

    #[test]
    fn test_seeded_runs_match() {
        let options = AppOptions {
            seed: Some(99),
            ..AppOptions::default()
        };
        let mut first = Vec::new();
        let mut second = Vec::new();
        App::new(&options).unwrap().run(&options, &mut first).unwrap();
        App::new(&options).unwrap().run(&options, &mut second).unwrap();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_script_prints_each_state() {
        let mut app = App::new(&AppOptions::default()).unwrap();
        let script = Script {
            equation: Some(EquationSpec {
                lhs: vec![
                    TermSpec::variable("x", Fraction::from_integer(2)),
                    TermSpec::constant(Fraction::from_integer(4)),
                ],
                rhs: vec![TermSpec::constant(Fraction::from_integer(10))],
            }),
            steps: vec![
                Step::Print,
                Step::Press {
                    side: Side::Lhs,
                    term: 1,
                    part: 0,
                },
                Step::DragTo { x: 0.0, y: -80.0 },
                Step::Wait { seconds: 0.5 },
                Step::DragOver { side: Side::Rhs, term: 0 },
                Step::Wait { seconds: 0.05 },
                Step::Release,
                Step::Print,
            ],
            ..Script::default()
        };
        let mut out = Vec::new();
        app.run_script(&script, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "2x + 4 = 10\n\n2x = 6\n\n");
        assert_eq!(app.equation().to_string(), "2x = 6");
    }
}
