//! Transcript parser: normalize, segment by role, extract commands

use crate::error::Result;
use crate::grammar::CommandGrammar;
use crate::lexicon::Lexicon;
use crate::normalize::normalize;
use crate::segment::segment;
use crate::types::{CrewRole, ParsedCommand};
use std::collections::BTreeMap;

/// Commands per role, each list in parse order
pub type RoleCommands = BTreeMap<CrewRole, Vec<ParsedCommand>>;

/// Main crew transcript parser
#[derive(Debug, Clone)]
pub struct CrewParser {
    grammar: CommandGrammar,
}

impl CrewParser {
    pub fn new(lexicon: Lexicon) -> Result<Self> {
        lexicon.validate()?;
        let grammar = CommandGrammar::new(lexicon.folded())?;
        Ok(Self { grammar })
    }

    pub fn lexicon(&self) -> &Lexicon {
        self.grammar.lexicon()
    }

    /// Parse a transcript into role-scoped commands. Roles with no commands
    /// are absent from the result.
    pub fn parse(&self, transcript: &str) -> RoleCommands {
        let lexicon = self.grammar.lexicon();
        let text = lexicon.fold_text(&normalize(transcript));
        let mut output = RoleCommands::new();

        for seg in segment(&text, lexicon, self.grammar.matcher()) {
            let cmds = self.grammar.commands(seg.role, seg.text);
            if cmds.is_empty() {
                tracing::debug!(role = %seg.role, segment = seg.text, "segment produced no commands");
                continue;
            }
            output.entry(seg.role).or_default().extend(cmds);
        }

        output
    }
}
