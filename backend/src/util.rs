use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
#[error("Retry failed")]
pub struct RetryFailed;

// Calls f once, then up to `times` more while it keeps failing
pub fn retry<T, E, F>(mut times: u32, f: F) -> Result<T, RetryFailed>
where
    F: Fn() -> Result<T, E>,
    E: std::error::Error,
{
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(err) if times == 0 => {
                warn!("No more retry attempts. Error: {}", err);
                return Err(RetryFailed);
            }
            Err(err) => {
                warn!("Retry triggered. Error: {}", err);
                times -= 1;
            }
        }
    }
}
