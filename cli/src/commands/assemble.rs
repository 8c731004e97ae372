use std::fs;

use camino::Utf8PathBuf;
use clap::{Parser, ValueHint};
use serde::Serialize;
use tracing::{debug, info};
use uvm::assemble;

#[derive(Parser, Debug)]
pub struct AssembleOpt {
    /// Assembly source file
    #[clap(value_parser, value_hint = ValueHint::FilePath)]
    input: Utf8PathBuf,

    /// Where to write the binary program image
    #[clap(value_parser, value_hint = ValueHint::FilePath)]
    output: Utf8PathBuf,

    /// Write a YAML log of the encoded instructions to this file
    #[clap(short, long, value_parser, value_hint = ValueHint::FilePath)]
    log: Option<Utf8PathBuf>,
}

/// One assembly log entry: the mnemonic and its encoding as hex bytes.
#[derive(Serialize)]
struct LogEntry {
    opcode: String,
    bytes: Vec<String>,
}

impl AssembleOpt {
    pub fn exec(self) -> anyhow::Result<()> {
        info!(path = %self.input, "Reading program");
        let source = fs::read_to_string(&self.input)?;

        debug!("Assembling program");
        let program = assemble(&source)?;

        let image = program.to_bytes();
        info!(path = %self.output, bytes = image.len(), "Writing program image");
        fs::write(&self.output, &image)?;

        if let Some(path) = &self.log {
            let entries: Vec<LogEntry> = program
                .instructions
                .iter()
                .map(|instruction| LogEntry {
                    opcode: instruction.opcode.to_string(),
                    bytes: instruction
                        .encode()
                        .iter()
                        .map(|byte| format!("0x{byte:02X}"))
                        .collect(),
                })
                .collect();

            info!(path = %path, "Writing assembly log");
            fs::write(path, serde_yaml::to_string(&entries)?)?;
        }

        Ok(())
    }
}
