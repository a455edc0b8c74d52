//! Per-role command grammar

use crate::error::Result;
use crate::lexicon::{Lexicon, MatchMode};
use crate::matcher::KeywordMatcher;
use crate::types::{
    CrewRole, DriverCommand, GunnerCommand, Intensity, LoaderCommand, ParsedCommand,
};
use regex::Regex;

/// Turns one role segment into zero or more commands
#[derive(Debug, Clone)]
pub struct CommandGrammar {
    lexicon: Lexicon,
    matcher: KeywordMatcher,
    range_pattern: Option<Regex>,
}

impl CommandGrammar {
    /// Build a grammar over an already folded lexicon.
    pub fn new(lexicon: Lexicon) -> Result<Self> {
        let matcher = KeywordMatcher::new(lexicon.match_mode);
        let range_pattern = build_range_pattern(&lexicon)?;
        Ok(Self {
            lexicon,
            matcher,
            range_pattern,
        })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn matcher(&self) -> &KeywordMatcher {
        &self.matcher
    }

    pub fn commands(&self, role: CrewRole, segment: &str) -> Vec<ParsedCommand> {
        match role {
            CrewRole::Driver => self.driver_commands(segment),
            CrewRole::Gunner => self.gunner_commands(segment),
            CrewRole::Loader => self.loader_commands(segment),
        }
    }

    fn has(&self, segment: &str, keys: &[String]) -> bool {
        self.matcher.contains_any(segment, keys)
    }

    fn intensity(&self, segment: &str) -> Intensity {
        if self.has(segment, &self.lexicon.intensity.large) {
            Intensity::Large
        } else if self.has(segment, &self.lexicon.intensity.small) {
            Intensity::Small
        } else {
            Intensity::Normal
        }
    }

    fn driver_commands(&self, segment: &str) -> Vec<ParsedCommand> {
        let kw = &self.lexicon.driver;
        let intensity = self.intensity(segment);
        let mut cmds = Vec::new();

        if self.has(segment, &kw.stop) {
            cmds.push(ParsedCommand::driver(DriverCommand::Stop, Intensity::Normal));
        }

        // pivot phrases usually contain the plain turn word
        if self.has(segment, &kw.pivot_left) {
            cmds.push(ParsedCommand::driver(DriverCommand::PivotLeft, intensity));
        } else if self.has(segment, &kw.turn_left) {
            cmds.push(ParsedCommand::driver(DriverCommand::TurnLeft, intensity));
        }
        if self.has(segment, &kw.pivot_right) {
            cmds.push(ParsedCommand::driver(DriverCommand::PivotRight, intensity));
        } else if self.has(segment, &kw.turn_right) {
            cmds.push(ParsedCommand::driver(DriverCommand::TurnRight, intensity));
        }

        if self.has(segment, &kw.forward) {
            cmds.push(ParsedCommand::driver(DriverCommand::MoveForward, intensity));
        }
        if self.has(segment, &kw.backward) {
            cmds.push(ParsedCommand::driver(DriverCommand::MoveBackward, intensity));
        }

        cmds
    }

    fn gunner_commands(&self, segment: &str) -> Vec<ParsedCommand> {
        let kw = &self.lexicon.gunner;
        let mut cmds = Vec::new();

        if let Some(meters) = self.extract_range(segment) {
            cmds.push(ParsedCommand::gunner(GunnerCommand::SetRange { meters }));
        }

        if self.has(segment, &kw.cease) {
            cmds.push(ParsedCommand::gunner(GunnerCommand::CeaseAction));
            return cmds;
        }

        if self.has(segment, &kw.align) {
            cmds.push(ParsedCommand::gunner(GunnerCommand::AlignHull));
        }
        if self.has(segment, &kw.aim) {
            cmds.push(ParsedCommand::gunner(GunnerCommand::AimAt));
        }
        if self.has(segment, &kw.track) {
            cmds.push(ParsedCommand::gunner(GunnerCommand::TrackTarget));
        }
        if self.has(segment, &kw.fire) {
            cmds.push(ParsedCommand::gunner(GunnerCommand::Fire));
        }

        cmds
    }

    fn loader_commands(&self, segment: &str) -> Vec<ParsedCommand> {
        let kw = &self.lexicon.loader;

        // AP wins when both rounds are named
        let cmd = if self.has(segment, &kw.ap) {
            Some(LoaderCommand::LoadAp)
        } else if self.has(segment, &kw.he) {
            Some(LoaderCommand::LoadHe)
        } else if self.has(segment, &kw.load) {
            Some(LoaderCommand::LoadDefault)
        } else if self.has(segment, &kw.cease) {
            Some(LoaderCommand::CeaseAction)
        } else {
            None
        };

        cmd.map(ParsedCommand::loader).into_iter().collect()
    }

    fn extract_range(&self, segment: &str) -> Option<f32> {
        let pattern = self.range_pattern.as_ref()?;
        pattern.captures_iter(segment).find_map(|captures| {
            let whole = captures.get(0)?;
            let digits: String = captures
                .name("value")?
                .as_str()
                .chars()
                .filter(char::is_ascii_digit)
                .collect();
            if digits.len() > 4 || !self.range_ends_cleanly(&segment[whole.end()..]) {
                return None;
            }
            digits.parse::<f32>().ok()
        })
    }

    /// The value (and unit) must not run on into more digits, or into a
    /// longer word when keywords are whole words.
    fn range_ends_cleanly(&self, rest: &str) -> bool {
        if rest.trim_start().starts_with(|c: char| c.is_ascii_digit()) {
            return false;
        }
        match self.lexicon.match_mode {
            MatchMode::WholeWord => !rest.starts_with(char::is_alphanumeric),
            MatchMode::Substring => true,
        }
    }
}

/// `<range keyword> <digits, a 4-digit value may be grouped by a comma or
/// space> [unit]`. Trailing text is checked in `extract_range`.
fn build_range_pattern(lexicon: &Lexicon) -> Result<Option<Regex>> {
    if lexicon.gunner.range.is_empty() {
        return Ok(None);
    }

    let mut keywords: Vec<&String> = lexicon.gunner.range.iter().collect();
    keywords.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let keywords = keywords
        .into_iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");

    let mut units: Vec<&String> = lexicon.gunner.range_units.iter().collect();
    units.sort_by_key(|u| std::cmp::Reverse(u.len()));
    let units = units
        .into_iter()
        .map(|u| regex::escape(u))
        .collect::<Vec<_>>()
        .join("|");

    let boundary = match lexicon.match_mode {
        MatchMode::WholeWord => r"\b",
        MatchMode::Substring => "",
    };
    let unit_part = if units.is_empty() {
        String::new()
    } else {
        format!(r"(?:\s*(?:{units}){boundary})?")
    };

    let pattern = format!(
        r"{boundary}(?:{keywords})\s*(?P<value>[0-9][, ][0-9]{{3}}|[0-9]+){unit_part}"
    );
    Ok(Some(Regex::new(&pattern)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> CommandGrammar {
        CommandGrammar::new(Lexicon::english().folded()).unwrap()
    }

    fn driver(cmd: DriverCommand, intensity: Intensity) -> ParsedCommand {
        ParsedCommand::driver(cmd, intensity)
    }

    #[test]
    fn test_driver_multiple_commands() {
        let g = grammar();
        assert_eq!(
            g.commands(CrewRole::Driver, "stop and turn left"),
            vec![
                driver(DriverCommand::Stop, Intensity::Normal),
                driver(DriverCommand::TurnLeft, Intensity::Normal),
            ]
        );
    }

    #[test]
    fn test_driver_intensity_applies_to_movement_only() {
        let g = grammar();
        assert_eq!(
            g.commands(CrewRole::Driver, "stop then forward slightly"),
            vec![
                driver(DriverCommand::Stop, Intensity::Normal),
                driver(DriverCommand::MoveForward, Intensity::Small),
            ]
        );
        assert_eq!(
            g.commands(CrewRole::Driver, "reverse fast"),
            vec![driver(DriverCommand::MoveBackward, Intensity::Large)]
        );
    }

    #[test]
    fn test_large_beats_small() {
        let g = grammar();
        assert_eq!(
            g.commands(CrewRole::Driver, "slightly fast forward"),
            vec![driver(DriverCommand::MoveForward, Intensity::Large)]
        );
    }

    #[test]
    fn test_pivot_suppresses_plain_turn() {
        let g = grammar();
        assert_eq!(
            g.commands(CrewRole::Driver, "pivot left"),
            vec![driver(DriverCommand::PivotLeft, Intensity::Normal)]
        );
        assert_eq!(
            g.commands(CrewRole::Driver, "pivot left then right"),
            vec![
                driver(DriverCommand::PivotLeft, Intensity::Normal),
                driver(DriverCommand::TurnRight, Intensity::Normal),
            ]
        );
    }

    #[test]
    fn test_range_with_grouping_and_unit() {
        let g = grammar();
        assert_eq!(
            g.commands(CrewRole::Gunner, "range 1,200m"),
            vec![ParsedCommand::gunner(GunnerCommand::SetRange { meters: 1200.0 })]
        );
        // the normalizer turns the comma into a space
        assert_eq!(
            g.commands(CrewRole::Gunner, "range 1 200m"),
            vec![ParsedCommand::gunner(GunnerCommand::SetRange { meters: 1200.0 })]
        );
        assert_eq!(
            g.commands(CrewRole::Gunner, "range 800 meters"),
            vec![ParsedCommand::gunner(GunnerCommand::SetRange { meters: 800.0 })]
        );
        assert_eq!(
            g.commands(CrewRole::Gunner, "range 1500"),
            vec![ParsedCommand::gunner(GunnerCommand::SetRange { meters: 1500.0 })]
        );
    }

    #[test]
    fn test_malformed_range_is_silent() {
        let g = grammar();
        assert!(g.commands(CrewRole::Gunner, "range far").is_empty());
        assert!(g.commands(CrewRole::Gunner, "orange 500").is_empty());
    }

    #[test]
    fn test_range_value_must_end_cleanly() {
        let g = grammar();
        assert!(g.commands(CrewRole::Gunner, "range 12345").is_empty());
        assert!(g.commands(CrewRole::Gunner, "range 800 100 meters").is_empty());
        assert!(g.commands(CrewRole::Gunner, "range 800x").is_empty());
        assert!(g.commands(CrewRole::Gunner, "range 1 2000").is_empty());
        // a word that merely starts with a unit is not a unit
        assert_eq!(
            g.commands(CrewRole::Gunner, "range 800 more or less"),
            vec![ParsedCommand::gunner(GunnerCommand::SetRange { meters: 800.0 })]
        );
        // a later well-formed range still counts
        assert_eq!(
            g.commands(CrewRole::Gunner, "range 12345 no range 900"),
            vec![ParsedCommand::gunner(GunnerCommand::SetRange { meters: 900.0 })]
        );
        assert_eq!(
            g.commands(CrewRole::Gunner, "range 900m then fire"),
            vec![
                ParsedCommand::gunner(GunnerCommand::SetRange { meters: 900.0 }),
                ParsedCommand::gunner(GunnerCommand::Fire),
            ]
        );
    }

    #[test]
    fn test_cease_short_circuits() {
        let g = grammar();
        assert_eq!(
            g.commands(CrewRole::Gunner, "cease aim and fire"),
            vec![ParsedCommand::gunner(GunnerCommand::CeaseAction)]
        );
        assert_eq!(
            g.commands(CrewRole::Gunner, "range 900 hold fire"),
            vec![
                ParsedCommand::gunner(GunnerCommand::SetRange { meters: 900.0 }),
                ParsedCommand::gunner(GunnerCommand::CeaseAction),
            ]
        );
    }

    #[test]
    fn test_gunner_commands_co_occur() {
        let g = grammar();
        assert_eq!(
            g.commands(CrewRole::Gunner, "align then aim track and fire"),
            vec![
                ParsedCommand::gunner(GunnerCommand::AlignHull),
                ParsedCommand::gunner(GunnerCommand::AimAt),
                ParsedCommand::gunner(GunnerCommand::TrackTarget),
                ParsedCommand::gunner(GunnerCommand::Fire),
            ]
        );
    }

    #[test]
    fn test_loader_ap_precedence() {
        let g = grammar();
        assert_eq!(
            g.commands(CrewRole::Loader, "he no ap"),
            vec![ParsedCommand::loader(LoaderCommand::LoadAp)]
        );
        assert_eq!(
            g.commands(CrewRole::Loader, "high explosive"),
            vec![ParsedCommand::loader(LoaderCommand::LoadHe)]
        );
        assert_eq!(
            g.commands(CrewRole::Loader, "load"),
            vec![ParsedCommand::loader(LoaderCommand::LoadDefault)]
        );
        assert_eq!(
            g.commands(CrewRole::Loader, "belay that"),
            vec![ParsedCommand::loader(LoaderCommand::CeaseAction)]
        );
        assert!(g.commands(CrewRole::Loader, "nothing here").is_empty());
    }

    #[test]
    fn test_korean_grammar() {
        let g = CommandGrammar::new(Lexicon::korean().folded()).unwrap();
        assert_eq!(
            g.commands(CrewRole::Driver, "제자리 좌회전 조금"),
            vec![driver(DriverCommand::PivotLeft, Intensity::Small)]
        );
        assert_eq!(
            g.commands(CrewRole::Gunner, "사거리 1,200m"),
            vec![ParsedCommand::gunner(GunnerCommand::SetRange { meters: 1200.0 })]
        );
        assert_eq!(
            g.commands(CrewRole::Loader, "철갑탄 고폭탄"),
            vec![ParsedCommand::loader(LoaderCommand::LoadAp)]
        );
    }

    #[test]
    fn test_no_range_keywords_disables_pattern() {
        let mut lexicon = Lexicon::english();
        lexicon.gunner.range.clear();
        let g = CommandGrammar::new(lexicon).unwrap();
        assert!(g.commands(CrewRole::Gunner, "range 500").is_empty());
    }
}
