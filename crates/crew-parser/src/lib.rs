//! crew-parser: transcript-to-command grammar for tank crew voice orders
//!
//! A recognizer transcript such as `"Gunner, aim! Loader, AP. Driver, forward."`
//! is normalized, cut into per-role segments at each role marker and turned
//! into typed commands for the driver, gunner and loader. Keyword tables are
//! data ([`Lexicon`]) so a deployment can switch language without rebuilding.

mod error;
pub use error::{LexiconError, Result};

mod types;
pub use types::{
    CommandKind, CrewRole, DriverCommand, GunnerCommand, Intensity, LoaderCommand, ParsedCommand,
};

pub mod lexicon;
pub use lexicon::{load_lexicon_file, Lexicon, MatchMode};

mod matcher;
pub use matcher::KeywordMatcher;

mod normalize;
pub use normalize::normalize;

pub mod segment;
pub use segment::{RoleMark, Segment};

mod grammar;
pub use grammar::CommandGrammar;

mod parser;
pub use parser::{CrewParser, RoleCommands};

/// Initialize the crew parser system
pub fn init() -> Result<()> {
    tracing::info!("Initializing crew parser");
    Ok(())
}

/// Create a parser with the default English lexicon
pub fn create_parser() -> Result<CrewParser> {
    CrewParser::new(Lexicon::default())
}

/// Parse a transcript with the default English lexicon
pub fn parse_transcript(text: &str) -> Result<RoleCommands> {
    let parser = create_parser()?;
    Ok(parser.parse(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_transcripts() {
        let test_cases = vec![
            ("driver forward", CrewRole::Driver),
            ("driver pivot left slightly", CrewRole::Driver),
            ("gunner range 800", CrewRole::Gunner),
            ("gunner cease", CrewRole::Gunner),
            ("loader high explosive", CrewRole::Loader),
            ("stop", CrewRole::Driver),
            ("load", CrewRole::Loader),
        ];

        for (text, role) in test_cases {
            let result = parse_transcript(text).unwrap();
            assert!(
                result.get(&role).is_some_and(|cmds| !cmds.is_empty()),
                "'{}' should address {}",
                text,
                role
            );
        }
    }
}
