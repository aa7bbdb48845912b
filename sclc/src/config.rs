use crate::error::Error;
use std::path::{Path, PathBuf};

/// Validated command line settings
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub include_dir: PathBuf,
    pub verbose: bool,
}

impl Config {
    pub fn new(
        input: PathBuf,
        output: Option<PathBuf>,
        include_dir: PathBuf,
        verbose: bool,
    ) -> Result<Self, Error> {
        if !include_dir.exists() {
            return Err(Error::IncludeDirMissing(include_dir));
        }
        if !include_dir.is_dir() {
            return Err(Error::NotADirectory(include_dir));
        }
        let output = output.unwrap_or_else(|| default_output(&input));
        Ok(Config {
            input,
            output,
            include_dir,
            verbose,
        })
    }

    /// `<output>.s`
    pub fn asm_path(&self) -> PathBuf {
        let mut path = self.output.clone().into_os_string();
        path.push(".s");
        PathBuf::from(path)
    }
}

/// The input with its last extension stripped, or `<input>.out` if it has none
pub fn default_output(input: &Path) -> PathBuf {
    match input.extension() {
        Some(_) => input.with_extension(""),
        None => input.with_extension("out"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_strips_last_extension() {
        assert_eq!(default_output(Path::new("main.sclc")), PathBuf::from("main"));
        assert_eq!(
            default_output(Path::new("dir/prog.test.sclc")),
            PathBuf::from("dir/prog.test")
        );
        assert_eq!(default_output(Path::new("prog")), PathBuf::from("prog.out"));
    }

    #[test]
    fn test_asm_path() {
        let config = Config::new("a.sclc".into(), None, ".".into(), false).unwrap();
        assert_eq!(config.output, PathBuf::from("a"));
        assert_eq!(config.asm_path(), PathBuf::from("a.s"));
    }

    #[test]
    fn test_missing_include_dir() {
        let result = Config::new(
            "a.sclc".into(),
            None,
            "/definitely/not/here".into(),
            false,
        );
        assert!(matches!(result, Err(Error::IncludeDirMissing(_))));
    }

    #[test]
    fn test_include_dir_must_be_directory() {
        let file = std::env::temp_dir().join("sclc_config_not_a_dir.txt");
        std::fs::write(&file, "x").unwrap();
        let result = Config::new("a.sclc".into(), None, file.clone(), false);
        assert!(matches!(result, Err(Error::NotADirectory(_))));
        std::fs::remove_file(file).unwrap();
    }
}
