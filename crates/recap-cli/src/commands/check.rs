//! Check command for probing a nickname.

use std::process::ExitCode;

use anyhow::Result;
use recap_core::{Recap, RecapConfig};

use super::NICKNAME_NOT_FOUND;

pub async fn run(config: &RecapConfig, nickname: &str) -> Result<ExitCode> {
    let recap = Recap::new(config)?;

    if recap.check_nickname_exists(nickname).await {
        println!("Nickname found: {}", nickname);
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", NICKNAME_NOT_FOUND);
        Ok(ExitCode::FAILURE)
    }
}
