use std::fs;

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueHint};
use serde::Serialize;
use tracing::{debug, info};
use uvm::constants::Word;
use uvm::Machine;

#[derive(Parser, Debug)]
pub struct RunOpt {
    /// Binary program image
    #[clap(value_parser, value_hint = ValueHint::FilePath)]
    input: Utf8PathBuf,

    /// First index of the dumped range
    #[clap(long, default_value_t = 0)]
    start: Word,

    /// Last index of the dumped range, inclusive
    #[clap(long, default_value_t = 30)]
    end: Word,

    /// Dump memory instead of the register file
    #[clap(short, long, action = ArgAction::SetTrue)]
    memory: bool,

    /// Write the YAML dump to this file instead of stdout
    #[clap(short, long, value_parser, value_hint = ValueHint::FilePath)]
    output: Option<Utf8PathBuf>,
}

/// The result artifact: the dumped cell range, keyed by which array it came
/// from.
#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Report<'a> {
    RegisterDump(Dump<'a>),
    MemoryDump(Dump<'a>),
}

#[derive(Serialize)]
struct Dump<'a> {
    start: Word,
    end: Word,
    data: &'a [Word],
}

impl RunOpt {
    pub fn exec(self) -> anyhow::Result<()> {
        info!(path = %self.input, "Reading program image");
        let code = fs::read(&self.input)?;

        let mut machine = Machine::new();
        machine.load(code);

        info!("Running program");
        machine.run()?;

        debug!(start = self.start, end = self.end, "Dumping state");
        let report = if self.memory {
            Report::MemoryDump(Dump {
                start: self.start,
                end: self.end,
                data: machine.memory.slice(self.start, self.end)?,
            })
        } else {
            Report::RegisterDump(Dump {
                start: self.start,
                end: self.end,
                data: machine.registers.slice(self.start, self.end)?,
            })
        };

        let yaml = serde_yaml::to_string(&report)?;
        match &self.output {
            Some(path) => fs::write(path, yaml)?,
            None => print!("{yaml}"),
        }

        Ok(())
    }
}
