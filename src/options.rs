use clap::Parser;

/// Query and configure PI30 protocol solar inverters
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Config file to read
    #[clap(short = 'c', long = "config")]
    pub config_file: Option<String>,

    /// Serial device, raw HID node (/dev/hidrawN) or TEST; overrides the config file
    #[clap(short = 'd', long = "device")]
    pub device: Option<String>,

    /// Command to run, e.g. QPIGS or PCVV56.4
    #[clap(short = 'C', long = "command", default_value = "QPIGS")]
    pub command: String,

    /// List the known commands and exit
    #[clap(short = 'l', long = "list")]
    pub list: bool,

    /// Print the result as JSON
    #[clap(short = 'j', long = "json")]
    pub json: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }
}

