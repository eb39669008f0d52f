//! Human or JSON rendering of command results.

use crate::api::ApiResponse;
use crate::cli::parser::Cli;
use crate::errors::AppResult;
use serde::Serialize;

/// Print `result` as the response envelope with `--json`, otherwise hand the
/// data to `human`. Failures are printed as an envelope in JSON mode and then
/// returned either way, so the process exits non-zero.
pub fn emit<T, F>(cli: &Cli, result: AppResult<T>, message: Option<&str>, human: F) -> AppResult<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    if !cli.json {
        let data = result?;
        human(&data);
        return Ok(());
    }

    match result {
        Ok(data) => {
            let resp = match message {
                Some(m) => ApiResponse::ok_with_message(m, data),
                None => ApiResponse::ok(data),
            };
            println!("{}", serde_json::to_string_pretty(&resp)?);
            Ok(())
        }
        Err(e) => {
            let resp = ApiResponse::<T>::failure(e.to_string());
            println!("{}", serde_json::to_string_pretty(&resp)?);
            Err(e)
        }
    }
}
