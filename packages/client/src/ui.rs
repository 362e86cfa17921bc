//! UI utilities for the client.

use std::io::Write;

pub const PROMPT: &str = "chalkboard> ";

/// Redisplay the prompt after printing a received event
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
