use crate::args::Args;
use crate::rcv::*;

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The JSON description of an election. All the fields are optional.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElectionConfig {
    #[serde(rename = "contestName")]
    pub contest_name: Option<String>,
    /// Relative paths are resolved against the directory of the configuration file.
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    #[serde(rename = "firstColumnIndex")]
    _first_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "tieBreakingRule")]
    pub tie_breaking_rule: Option<String>,
    #[serde(rename = "randomSeed")]
    _random_seed: Option<JSValue>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

impl ElectionConfig {
    pub fn first_column_index(&self) -> RcvResult<Option<usize>> {
        match read_js_int(&self._first_column_index, "firstColumnIndex")? {
            Some(x) => usize::try_from(x)
                .ok()
                .map(Some)
                .context(ParsingJsonNumberSnafu {
                    field: "firstColumnIndex",
                }),
            None => Ok(None),
        }
    }

    pub fn random_seed(&self) -> RcvResult<Option<u64>> {
        read_js_int(&self._random_seed, "randomSeed")
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Xlsx,
    Csv,
}

impl InputType {
    fn from_name(name: &str) -> RcvResult<InputType> {
        match name.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            "csv" => Ok(InputType::Csv),
            _ => UnknownInputTypeSnafu { input_type: name }.fail(),
        }
    }

    /// Guesses the type of the input from the extension. Excel is the default.
    fn from_path(path: &str) -> InputType {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputType::Csv,
            _ => InputType::Xlsx,
        }
    }
}

/// The settings of a run, once the command line and the configuration file are merged.
#[derive(PartialEq, Debug, Clone)]
pub struct Settings {
    pub contest_name: String,
    pub input_path: String,
    pub input_type: InputType,
    pub first_column_index: usize,
    pub excel_worksheet_name: Option<String>,
    pub rule: TieBreakingRule,
    pub seed: Option<u64>,
    pub out: Option<String>,
}

pub const DEFAULT_FIRST_COLUMN_INDEX: usize = 1;

pub fn read_config(path: &str) -> RcvResult<ElectionConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ElectionConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Reads the configuration file, if any, and applies the command line on top of it.
pub fn read_settings(args: &Args) -> RcvResult<Settings> {
    match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            merge_settings(args, &config, &root)
        }
        None => merge_settings(args, &ElectionConfig::default(), Path::new("")),
    }
}

fn resolve_path(root: &Path, path: &str) -> String {
    if path == "stdout" {
        return path.to_string();
    }
    let p: PathBuf = root.join(path);
    p.as_path().display().to_string()
}

pub fn merge_settings(args: &Args, config: &ElectionConfig, root: &Path) -> RcvResult<Settings> {
    let input_path = args
        .input
        .clone()
        .or_else(|| config.file_path.as_ref().map(|p| resolve_path(root, p)))
        .context(MissingInputSnafu {})?;

    let input_type = match args.input_type.as_ref().or(config.input_type.as_ref()) {
        Some(name) => InputType::from_name(name)?,
        None => InputType::from_path(&input_path),
    };

    let first_column_index = match args.first_column_index {
        Some(x) => x,
        None => config
            .first_column_index()?
            .unwrap_or(DEFAULT_FIRST_COLUMN_INDEX),
    };

    let rule: TieBreakingRule = match args.tie_breaking_rule.as_ref().or(config.tie_breaking_rule.as_ref()) {
        Some(name) => name.parse().context(VotingSnafu {})?,
        None => TieBreakingRule::default(),
    };

    let seed = match args.seed {
        Some(s) => Some(s),
        None => config.random_seed()?,
    };

    // An empty path disables the summary.
    let out = match args.out.as_ref().or(config.output_path.as_ref()) {
        Some(p) if p.trim().is_empty() => None,
        Some(p) if args.out.is_some() => Some(p.clone()),
        Some(p) => Some(resolve_path(root, p)),
        None => None,
    };

    let contest_name = config.contest_name.clone().unwrap_or_else(|| {
        Path::new(&input_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("election")
            .to_string()
    });

    Ok(Settings {
        contest_name,
        input_path,
        input_type,
        first_column_index,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| config.excel_worksheet_name.clone()),
        rule,
        seed,
        out,
    })
}

fn read_js_int(x: &Option<JSValue>, field: &str) -> RcvResult<Option<u64>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(Some)
            .context(ParsingJsonNumberSnafu { field }),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<u64>()
            .ok()
            .map(Some)
            .context(ParsingJsonNumberSnafu { field }),
        Some(_) => ParsingJsonNumberSnafu { field }.fail(),
    }
}
