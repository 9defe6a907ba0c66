use std::sync::LazyLock;

use regex::Regex;

use crate::source::OverrideSource;

/// Pixel thresholds separating the five screen-size bands.
///
/// The defaults give the band layout `xs < 600 <= sm < 960 <= md < 1280 <=
/// lg < 1920 <= xlg`. A host can replace any subset of them at startup by
/// calling [`Breakpoints::load`] with a stylesheet-like override source;
/// afterwards the value is fixed and a [`SizeResolver`](crate::SizeResolver)
/// is built from it.
///
/// Thresholds are expected to be strictly increasing. This is not enforced;
/// an inverted pair degrades to a degenerate never-matching band rather than
/// an error.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoints {
    pub sm_screen_width: f64,
    pub md_screen_width: f64,
    pub lg_screen_width: f64,
    pub xlg_screen_width: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            sm_screen_width: 600.0,
            md_screen_width: 960.0,
            lg_screen_width: 1280.0,
            xlg_screen_width: 1920.0,
        }
    }
}

impl Breakpoints {
    /// Fetches override text from `source` and applies it on top of the
    /// current thresholds.
    ///
    /// This call never fails: a missing source, a fetch error, empty text,
    /// or an unparsable value each degrade to keeping the current value, so
    /// host startup sequencing is never blocked by a broken override file.
    pub async fn load<S: OverrideSource>(&mut self, source: Option<&S>) {
        let Some(source) = source else { return };
        let text = source.fetch().await.unwrap_or_default();
        if !text.is_empty() {
            self.apply_overrides(&text);
        }
    }

    /// Applies `<key> : <number>px` overrides found in `text`.
    ///
    /// Recognized keys are `smScreenWidth`, `mdScreenWidth`, `lgScreenWidth`
    /// and `xlgScreenWidth`. Each key is extracted independently: a key that
    /// is absent, or whose value does not parse to a finite number, leaves
    /// that threshold untouched.
    pub fn apply_overrides(&mut self, text: &str) {
        for (key, slot) in [
            ("smScreenWidth", &mut self.sm_screen_width),
            ("mdScreenWidth", &mut self.md_screen_width),
            ("lgScreenWidth", &mut self.lg_screen_width),
            ("xlgScreenWidth", &mut self.xlg_screen_width),
        ] {
            if let Some(value) = extract_px(text, key) {
                *slot = value;
            }
        }
    }
}

/// Finds the first `<key> : <number>px` declaration in `text` and parses its
/// value. The numeric literal must immediately precede the `px` suffix;
/// whitespace around the colon is arbitrary.
fn extract_px(text: &str, key: &str) -> Option<f64> {
    static PX_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"([A-Za-z]+)\s*:\s*([+-]?[0-9]*\.?[0-9]+)px").unwrap()
    });

    PX_DECLARATION
        .captures_iter(text)
        .find(|caps| &caps[1] == key)
        .and_then(|caps| caps[2].parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
