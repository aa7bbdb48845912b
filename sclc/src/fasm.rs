use crate::error::Error;
use std::path::Path;
use std::process::Command;

/// Run `fasm <source> <output>`. fasm writes its own messages to the terminal.
pub fn assemble(source: &Path, output: &Path) -> Result<(), Error> {
    let status = Command::new("fasm")
        .arg(source)
        .arg(output)
        .status()
        .map_err(Error::AssemblerSpawn)?;
    if !status.success() {
        return Err(Error::AssemblerFailed(status.to_string()));
    }
    Ok(())
}
