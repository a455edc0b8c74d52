//! Keyword lexicons for the crew grammar
//!
//! Every keyword the grammar reacts to lives here so a deployment can swap
//! languages without recompiling. Lexicons deserialize from YAML or JSON; any
//! group or keyword list left out of a file falls back to the English preset.

use crate::error::{LexiconError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How a keyword must sit in the text to count as a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain substring search (agglutinative languages)
    Substring,
    /// Keyword must be bounded by non-alphanumeric characters or the text edges
    #[default]
    WholeWord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub match_mode: MatchMode,
    /// Fold transcript and keywords to lowercase before matching
    pub case_insensitive: bool,
    pub roles: RoleKeywords,
    pub driver: DriverKeywords,
    pub intensity: IntensityKeywords,
    pub gunner: GunnerKeywords,
    pub loader: LoaderKeywords,
}

/// Role markers that open a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleKeywords {
    pub driver: Vec<String>,
    pub gunner: Vec<String>,
    pub loader: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverKeywords {
    pub stop: Vec<String>,
    pub forward: Vec<String>,
    pub backward: Vec<String>,
    pub turn_left: Vec<String>,
    pub turn_right: Vec<String>,
    pub pivot_left: Vec<String>,
    pub pivot_right: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityKeywords {
    pub small: Vec<String>,
    pub large: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GunnerKeywords {
    /// Words introducing a numeric range ("range 800")
    pub range: Vec<String>,
    /// Optional unit tokens following the range digits
    pub range_units: Vec<String>,
    pub cease: Vec<String>,
    pub align: Vec<String>,
    pub aim: Vec<String>,
    pub track: Vec<String>,
    pub fire: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderKeywords {
    pub ap: Vec<String>,
    pub he: Vec<String>,
    pub load: Vec<String>,
    pub cease: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}

impl Default for RoleKeywords {
    fn default() -> Self {
        Lexicon::english().roles
    }
}

impl Default for DriverKeywords {
    fn default() -> Self {
        Lexicon::english().driver
    }
}

impl Default for IntensityKeywords {
    fn default() -> Self {
        Lexicon::english().intensity
    }
}

impl Default for GunnerKeywords {
    fn default() -> Self {
        Lexicon::english().gunner
    }
}

impl Default for LoaderKeywords {
    fn default() -> Self {
        Lexicon::english().loader
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Lexicon {
    /// English lexicon with whole-word, case-insensitive matching
    pub fn english() -> Self {
        Self {
            match_mode: MatchMode::WholeWord,
            case_insensitive: true,
            roles: RoleKeywords {
                driver: words(&["driver"]),
                gunner: words(&["gunner"]),
                loader: words(&["loader"]),
            },
            driver: DriverKeywords {
                stop: words(&["stop", "halt", "hold position"]),
                forward: words(&["forward", "ahead", "advance"]),
                backward: words(&["backward", "back up", "reverse"]),
                turn_left: words(&["left", "turn left"]),
                turn_right: words(&["right", "turn right"]),
                pivot_left: words(&["pivot left", "neutral left"]),
                pivot_right: words(&["pivot right", "neutral right"]),
            },
            intensity: IntensityKeywords {
                small: words(&["slightly", "a little", "slowly", "gently"]),
                large: words(&["hard", "a lot", "fast", "quickly", "full"]),
            },
            gunner: GunnerKeywords {
                range: words(&["range"]),
                range_units: words(&["meters", "meter", "metres", "metre", "m"]),
                cease: words(&["cease", "hold fire", "stand down"]),
                align: words(&["align", "center turret"]),
                aim: words(&["aim", "lay on"]),
                track: words(&["track", "follow"]),
                fire: words(&["fire", "shoot"]),
            },
            loader: LoaderKeywords {
                ap: words(&["ap", "armor piercing", "armour piercing"]),
                he: words(&["he", "high explosive"]),
                load: words(&["load", "reload"]),
                cease: words(&["cease", "belay"]),
            },
        }
    }

    /// Korean lexicon, substring matching as spoken crew orders run words together
    pub fn korean() -> Self {
        Self {
            match_mode: MatchMode::Substring,
            case_insensitive: true,
            roles: RoleKeywords {
                driver: words(&["조종수", "조종", "운전수", "드라이버"]),
                gunner: words(&["포", "포수", "보수", "포스", "포주", "거너"]),
                // "장전" is the load order itself, so it cannot also mark the loader
                loader: words(&["장전수", "로더"]),
            },
            driver: DriverKeywords {
                stop: words(&["정지", "멈춰", "스톱", "서", "그만"]),
                forward: words(&["전진", "앞으로", "전방"]),
                backward: words(&["후진", "뒤로", "후방", "백"]),
                turn_left: words(&["좌회전", "왼쪽", "좌로"]),
                turn_right: words(&["우회전", "오른쪽", "우로"]),
                pivot_left: words(&["제자리 좌회전", "제자리 왼쪽", "피벗 좌"]),
                pivot_right: words(&["제자리 우회전", "제자리 오른쪽", "피벗 우"]),
            },
            intensity: IntensityKeywords {
                small: words(&["조금", "살짝", "약하게", "천천히"]),
                large: words(&["크게", "많이", "강하게", "빠르게", "빨리"]),
            },
            gunner: GunnerKeywords {
                range: words(&["사거리", "거리"]),
                range_units: words(&["미터", "m"]),
                cease: words(&["중지", "사격 중지", "취소"]),
                align: words(&["정렬", "차체 정렬"]),
                aim: words(&["조준"]),
                track: words(&["추적"]),
                fire: words(&["발사", "사격", "격발", "쏴", "쏴라"]),
            },
            loader: LoaderKeywords {
                ap: words(&["철갑", "ap", "철갑탄"]),
                he: words(&["고폭", "he", "고폭탄"]),
                load: words(&["장전"]),
                cease: words(&["중지", "취소"]),
            },
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let lexicon: Lexicon =
            serde_yaml::from_str(raw).map_err(|e| LexiconError::Decode(e.to_string()))?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let lexicon: Lexicon =
            serde_json::from_str(raw).map_err(|e| LexiconError::Decode(e.to_string()))?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Reject lexicons the segmenter cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.roles.driver.is_empty() {
            return Err(LexiconError::MissingRole("driver"));
        }
        if self.roles.gunner.is_empty() {
            return Err(LexiconError::MissingRole("gunner"));
        }
        if self.roles.loader.is_empty() {
            return Err(LexiconError::MissingRole("loader"));
        }

        for (group, keys) in self.groups() {
            if keys.iter().any(|k| k.trim().is_empty()) {
                return Err(LexiconError::EmptyKeyword(group));
            }
        }
        Ok(())
    }

    /// Copy of this lexicon with keywords folded the way transcripts will be.
    pub fn folded(&self) -> Self {
        if !self.case_insensitive {
            return self.clone();
        }
        let mut out = self.clone();
        for keys in out.groups_mut() {
            for key in keys.iter_mut() {
                *key = key.to_lowercase();
            }
        }
        out
    }

    /// Apply the configured case folding to transcript text.
    pub fn fold_text(&self, text: &str) -> String {
        if self.case_insensitive {
            text.to_lowercase()
        } else {
            text.to_string()
        }
    }

    fn groups(&self) -> [(&'static str, &Vec<String>); 23] {
        [
            ("roles.driver", &self.roles.driver),
            ("roles.gunner", &self.roles.gunner),
            ("roles.loader", &self.roles.loader),
            ("driver.stop", &self.driver.stop),
            ("driver.forward", &self.driver.forward),
            ("driver.backward", &self.driver.backward),
            ("driver.turn_left", &self.driver.turn_left),
            ("driver.turn_right", &self.driver.turn_right),
            ("driver.pivot_left", &self.driver.pivot_left),
            ("driver.pivot_right", &self.driver.pivot_right),
            ("intensity.small", &self.intensity.small),
            ("intensity.large", &self.intensity.large),
            ("gunner.range", &self.gunner.range),
            ("gunner.range_units", &self.gunner.range_units),
            ("gunner.cease", &self.gunner.cease),
            ("gunner.align", &self.gunner.align),
            ("gunner.aim", &self.gunner.aim),
            ("gunner.track", &self.gunner.track),
            ("gunner.fire", &self.gunner.fire),
            ("loader.ap", &self.loader.ap),
            ("loader.he", &self.loader.he),
            ("loader.load", &self.loader.load),
            ("loader.cease", &self.loader.cease),
        ]
    }

    fn groups_mut(&mut self) -> [&mut Vec<String>; 23] {
        [
            &mut self.roles.driver,
            &mut self.roles.gunner,
            &mut self.roles.loader,
            &mut self.driver.stop,
            &mut self.driver.forward,
            &mut self.driver.backward,
            &mut self.driver.turn_left,
            &mut self.driver.turn_right,
            &mut self.driver.pivot_left,
            &mut self.driver.pivot_right,
            &mut self.intensity.small,
            &mut self.intensity.large,
            &mut self.gunner.range,
            &mut self.gunner.range_units,
            &mut self.gunner.cease,
            &mut self.gunner.align,
            &mut self.gunner.aim,
            &mut self.gunner.track,
            &mut self.gunner.fire,
            &mut self.loader.ap,
            &mut self.loader.he,
            &mut self.loader.load,
            &mut self.loader.cease,
        ]
    }
}

/// Load a lexicon file, YAML or JSON by extension.
pub fn load_lexicon_file(path: impl AsRef<Path>) -> anyhow::Result<Lexicon> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading lexicon: {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let lexicon = if is_json {
        Lexicon::from_json_str(&raw)
    } else {
        Lexicon::from_yaml_str(&raw)
    }
    .with_context(|| format!("decoding lexicon: {}", path.display()))?;
    tracing::info!("Loaded lexicon from {}", path.display());
    Ok(lexicon)
}
