use anyhow::Result;

use mpp_solar::prelude::*;

fn main() -> Result<()> {
    let options = Options::new();

    let code = mpp_solar::app(options)?;
    std::process::exit(code);
}
