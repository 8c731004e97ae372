mod assemble;
mod completion;
mod run;

#[derive(clap::Subcommand)]
pub enum Subcommand {
    /// Assemble a source file into a binary program image
    Assemble(self::assemble::AssembleOpt),

    /// Run a binary program image and dump machine state
    Run(self::run::RunOpt),

    /// Generate shell completion
    Completion(self::completion::CompletionOpt),
}

impl Subcommand {
    /// Run a subcommand
    pub fn exec(self) -> anyhow::Result<()> {
        match self {
            Subcommand::Assemble(opt) => opt.exec(),
            Subcommand::Run(opt) => opt.exec(),
            Subcommand::Completion(opt) => opt.exec(),
        }
    }
}
