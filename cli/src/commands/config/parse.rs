//! # Jolt Config Parse Handler
//!
//! File: cli/src/commands/config/parse.rs
//!
//! ## Overview
//!
//! Implements `jolt config parse <template>`: runs the template through the
//! same interpolation every wrapped command uses and prints the result.
//! Parameters for `{arg:...}` / `{param:...}` placeholders are passed with
//! `-p key=value`.
//!
use crate::commands::parse_key_val;
use crate::core::error::Result;
use crate::core::resolver::ConfigResolver;
use clap::Parser;
use std::collections::HashMap;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Template text, e.g. "{conf:imageName}:{git:sha}".
    template: String,
    /// Values for {arg:NAME} placeholders.
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    params: Vec<(String, String)>,
}

pub async fn handle_parse(args: ParseArgs, resolver: &ConfigResolver) -> Result<()> {
    debug!("Parse args: {:?}", args);
    let params: HashMap<String, String> = args.params.into_iter().collect();
    let output = resolver.parse_arg(&args.template, &params).await;
    println!("{}", output);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args =
            ParseArgs::try_parse_from(["parse", "{arg:a}-{arg:b}", "-p", "a=1", "--param", "b=2"])
                .unwrap();
        assert_eq!(args.template, "{arg:a}-{arg:b}");
        assert_eq!(
            args.params,
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );
        assert!(ParseArgs::try_parse_from(["parse", "x", "-p", "novalue"]).is_err());
    }
}
