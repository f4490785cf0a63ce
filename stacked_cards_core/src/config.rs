// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance options, defaults, and tolerant override parsing.
//!
//! Options reach a root through a JSON attribute. Parsing never fails: a
//! payload that is not valid JSON, or not a JSON object, yields
//! [`OptionOverrides::default`], and each field that is missing, of the wrong
//! type, or out of range simply keeps its default when
//! [`StackedCardsOptions::resolve`] merges the overrides.

use alloc::string::{String, ToString};

use serde_json::{Map, Value};

use crate::color::Rgba;

/// Marker attribute identifying a stacked-cards root.
pub const ROOT_SELECTOR: &str = "[data-stacked-cards-root]";
/// Marker attribute identifying the pinned region inside a root.
pub const PINNED_SELECTOR: &str = "[data-stacked-cards-pinned]";
/// Marker attribute identifying the card track inside a root.
pub const TRACK_SELECTOR: &str = "[data-stacked-cards-track]";
/// Marker attribute identifying each card inside a root.
pub const CARD_SELECTOR: &str = "[data-stacked-cards-card]";
/// Attribute holding the serialized per-instance options.
pub const OPTIONS_ATTRIBUTE: &str = "data-stacked-cards-options";
/// Output attribute carrying the enhancement flag (`"true"` / `"false"`).
pub const ENHANCED_ATTRIBUTE: &str = "data-enhanced";
/// Output attribute carrying the active pin mode while enhanced.
pub const PIN_MODE_ATTRIBUTE: &str = "data-stacked-cards-pin-mode";

/// Media query for the reduced-motion system preference.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
/// Media query for the mobile breakpoint.
pub const MOBILE_QUERY: &str = "(max-width: 900px)";
/// Viewport width at or below which the mobile breakpoint matches.
pub const MOBILE_MAX_WIDTH: f64 = 900.0;

/// How the root is held in place while its cards are stepped through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PinMode {
    /// Host CSS keeps the pinned region in place (`position: sticky`).
    Sticky,
    /// The pin trigger translates the root and reserves spacing after it.
    #[default]
    Gsap,
}

impl PinMode {
    /// Returns the attribute value for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sticky => "sticky",
            Self::Gsap => "gsap",
        }
    }

    /// Parses an attribute value. Unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sticky" => Some(Self::Sticky),
            "gsap" => Some(Self::Gsap),
            _ => None,
        }
    }
}

/// Timing and geometry of the step animation.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationOptions {
    /// Pin trigger start, `"<element edge> <viewport edge>"`.
    pub start: String,
    /// Pin trigger end, absolute like `start` or relative (`"+=100"`).
    pub end: String,
    /// Vertical offset between consecutive resting cards, in pixels.
    pub y_offset_step: f64,
    /// Duration of one step, in seconds.
    pub step_duration: f64,
    /// Background color a card reaches once it has been stacked.
    pub active_color: Rgba,
}

impl AnimationOptions {
    /// Default pin trigger start.
    pub const DEFAULT_START: &'static str = "top 20%";
    /// Default pin trigger end.
    pub const DEFAULT_END: &'static str = "+=100";
    /// Default offset between resting cards.
    pub const DEFAULT_Y_OFFSET_STEP: f64 = 20.0;
    /// Default step duration in seconds.
    pub const DEFAULT_STEP_DURATION: f64 = 0.5;
    /// Default active color, `#3498db`.
    pub const DEFAULT_ACTIVE_COLOR: Rgba = Rgba::new(0x34, 0x98, 0xdb, 1.0);
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            start: Self::DEFAULT_START.to_string(),
            end: Self::DEFAULT_END.to_string(),
            y_offset_step: Self::DEFAULT_Y_OFFSET_STEP,
            step_duration: Self::DEFAULT_STEP_DURATION,
            active_color: Self::DEFAULT_ACTIVE_COLOR,
        }
    }
}

/// Fully resolved options for one instance.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedCardsOptions {
    /// Pinning strategy.
    pub pin_mode: PinMode,
    /// Forces static mode when set.
    pub reduced_motion: bool,
    /// Step animation settings.
    pub animation: AnimationOptions,
}

impl StackedCardsOptions {
    /// Merges `overrides` over the defaults.
    ///
    /// `system_reduced_motion` is the host's reduced-motion preference and is
    /// used only when the overrides do not set `reducedMotion`.
    #[must_use]
    pub fn resolve(overrides: &OptionOverrides, system_reduced_motion: bool) -> Self {
        let defaults = AnimationOptions::default();
        let a = &overrides.animation;
        Self {
            pin_mode: overrides.pin_mode.unwrap_or_default(),
            reduced_motion: overrides.reduced_motion.unwrap_or(system_reduced_motion),
            animation: AnimationOptions {
                start: a.start.clone().unwrap_or(defaults.start),
                end: a.end.clone().unwrap_or(defaults.end),
                y_offset_step: a.y_offset_step.unwrap_or(defaults.y_offset_step),
                step_duration: a.step_duration.unwrap_or(defaults.step_duration),
                active_color: a.active_color.unwrap_or(defaults.active_color),
            },
        }
    }
}

/// Partial options as supplied by a root's options attribute.
///
/// Every field is already validated; `None` means "use the default".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionOverrides {
    /// `pinMode`.
    pub pin_mode: Option<PinMode>,
    /// `reducedMotion`.
    pub reduced_motion: Option<bool>,
    /// `animation`.
    pub animation: AnimationOverrides,
}

/// Partial [`AnimationOptions`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationOverrides {
    /// `animation.start`.
    pub start: Option<String>,
    /// `animation.end`.
    pub end: Option<String>,
    /// `animation.yOffsetStep`.
    pub y_offset_step: Option<f64>,
    /// `animation.stepDuration`.
    pub step_duration: Option<f64>,
    /// `animation.activeColor`.
    pub active_color: Option<Rgba>,
}

impl OptionOverrides {
    /// Parses the options attribute.
    ///
    /// A missing or empty attribute, malformed JSON, and non-object payloads
    /// all produce empty overrides.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::default();
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Self::from_object(&map),
            _ => Self::default(),
        }
    }

    fn from_object(map: &Map<String, Value>) -> Self {
        let animation = match map.get("animation") {
            Some(Value::Object(anim)) => AnimationOverrides {
                start: non_empty_str(anim.get("start")),
                end: non_empty_str(anim.get("end")),
                y_offset_step: anim
                    .get("yOffsetStep")
                    .and_then(Value::as_f64)
                    .filter(|v| v.is_finite()),
                step_duration: anim
                    .get("stepDuration")
                    .and_then(Value::as_f64)
                    .filter(|v| v.is_finite() && *v >= 0.0),
                active_color: anim
                    .get("activeColor")
                    .and_then(Value::as_str)
                    .and_then(Rgba::parse),
            },
            _ => AnimationOverrides::default(),
        };
        Self {
            pin_mode: map
                .get("pinMode")
                .and_then(Value::as_str)
                .and_then(PinMode::parse),
            reduced_motion: map.get("reducedMotion").and_then(Value::as_bool),
            animation,
        }
    }
}

fn non_empty_str(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_attribute_missing() {
        let opts = StackedCardsOptions::resolve(&OptionOverrides::parse(None), false);
        assert_eq!(opts.pin_mode, PinMode::Gsap);
        assert!(!opts.reduced_motion);
        assert_eq!(opts.animation, AnimationOptions::default());
        assert_eq!(opts.animation.start, "top 20%");
        assert_eq!(opts.animation.end, "+=100");
    }

    #[test]
    fn malformed_and_non_object_payloads_yield_no_overrides() {
        for raw in ["{", "not json", "[1, 2]", "42", "null", "\"gsap\"", "   "] {
            assert_eq!(
                OptionOverrides::parse(Some(raw)),
                OptionOverrides::default(),
                "payload {raw:?}"
            );
        }
    }

    #[test]
    fn partial_overrides_merge_over_defaults() {
        let raw = r##"{"pinMode":"sticky","animation":{"stepDuration":0.25,"activeColor":"#fff"}}"##;
        let opts = StackedCardsOptions::resolve(&OptionOverrides::parse(Some(raw)), false);
        assert_eq!(opts.pin_mode, PinMode::Sticky);
        assert_eq!(opts.animation.step_duration, 0.25);
        assert_eq!(opts.animation.active_color, Rgba::new(255, 255, 255, 1.0));
        assert_eq!(opts.animation.y_offset_step, 20.0);
        assert_eq!(opts.animation.start, "top 20%");
    }

    #[test]
    fn named_and_hsl_active_colors_are_kept() {
        let named = OptionOverrides::parse(Some(r#"{"animation":{"activeColor":"tomato"}}"#));
        let opts = StackedCardsOptions::resolve(&named, false);
        assert_eq!(opts.animation.active_color, Rgba::new(255, 99, 71, 1.0));

        let hsl = OptionOverrides::parse(Some(
            r#"{"animation":{"activeColor":"hsl(120, 100%, 25%)"}}"#,
        ));
        assert_eq!(hsl.animation.active_color, Some(Rgba::new(0, 128, 0, 1.0)));

        let unknown = OptionOverrides::parse(Some(r#"{"animation":{"activeColor":"glitter"}}"#));
        assert_eq!(
            StackedCardsOptions::resolve(&unknown, false).animation.active_color,
            AnimationOptions::DEFAULT_ACTIVE_COLOR
        );
    }

    #[test]
    fn invalid_fields_fall_back_individually() {
        let raw = r#"{"pinMode":"fixed","reducedMotion":"yes","animation":{"yOffsetStep":"20px","stepDuration":-1,"end":"bottom top"}}"#;
        let overrides = OptionOverrides::parse(Some(raw));
        assert_eq!(overrides.pin_mode, None);
        assert_eq!(overrides.reduced_motion, None);
        assert_eq!(overrides.animation.y_offset_step, None);
        assert_eq!(overrides.animation.step_duration, None);
        assert_eq!(overrides.animation.end.as_deref(), Some("bottom top"));
    }

    #[test]
    fn explicit_reduced_motion_wins_over_system_preference() {
        let off = OptionOverrides::parse(Some(r#"{"reducedMotion":false}"#));
        assert!(!StackedCardsOptions::resolve(&off, true).reduced_motion);

        let unset = OptionOverrides::default();
        assert!(StackedCardsOptions::resolve(&unset, true).reduced_motion);
    }

    #[test]
    fn pin_mode_round_trips_through_attribute_value() {
        assert_eq!(PinMode::parse(PinMode::Sticky.as_str()), Some(PinMode::Sticky));
        assert_eq!(PinMode::parse(PinMode::Gsap.as_str()), Some(PinMode::Gsap));
    }
}
