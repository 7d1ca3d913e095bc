use core::str::FromStr;

use log::debug;

use crate::bitset::FeatureSet;
use crate::buffer::{GlyphNode, NodeId, Run, Segment};
use crate::complex::JoiningNeighbors;
use crate::ot::position::{propagate_attachment_offsets, PosLookup};
use crate::ot::substitute::SubstLookup;
use crate::ot::{apply_layout_table, choose_lang_sys, collect_lookups, ApplyContext};
use crate::ot::UnsupportedLookupPolicy;
use crate::tables::{LayoutTable, LookupIndex};
use crate::{Direction, Face, Feature, Language, Result, Script};

/// A feature to enable or disable.
///
/// Parses from a feature tag, optionally prefixed with `+` or `-`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FeatureSetting {
    pub feature: Feature,
    pub enabled: bool,
}

impl FromStr for FeatureSetting {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (enabled, tag) = match s.as_bytes().first() {
            Some(b'-') => (false, &s[1..]),
            Some(b'+') => (true, &s[1..]),
            _ => (true, s),
        };

        Ok(FeatureSetting { feature: tag.parse()?, enabled })
    }
}

/// Shaping options bound to a face.
///
/// The script is guessed from the run unless set, and the direction
/// follows the script unless set.
#[derive(Clone, Debug)]
pub struct ShapingContext<'a, 'f> {
    face: &'a Face<'f>,
    script: Option<Script>,
    language: Language,
    direction: Option<Direction>,
    features: FeatureSet,
    joining_neighbors: JoiningNeighbors,
    policy: UnsupportedLookupPolicy,
}

impl<'a, 'f> ShapingContext<'a, 'f> {
    pub fn new(face: &'a Face<'f>) -> Self {
        ShapingContext {
            face,
            script: None,
            language: Language::Default,
            direction: None,
            features: FeatureSet::new(),
            joining_neighbors: JoiningNeighbors::default(),
            policy: UnsupportedLookupPolicy::default(),
        }
    }

    pub fn script(mut self, script: Script) -> Self {
        self.script = Some(script);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Enables a feature. Enabling it again has no further effect.
    pub fn feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    pub fn features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features.extend(features);
        self
    }

    /// Enables or disables a feature.
    pub fn setting(mut self, setting: FeatureSetting) -> Self {
        if setting.enabled {
            self.features.insert(setting.feature);
        } else {
            self.features.remove(setting.feature);
        }
        self
    }

    pub fn joining_neighbors(mut self, neighbors: JoiningNeighbors) -> Self {
        self.joining_neighbors = neighbors;
        self
    }

    /// Makes unsupported lookup types fail the call instead of being skipped.
    pub fn strict(mut self, strict: bool) -> Self {
        self.policy = if strict {
            UnsupportedLookupPolicy::Strict
        } else {
            UnsupportedLookupPolicy::Lenient
        };
        self
    }

    #[inline]
    pub fn enabled_features(&self) -> &FeatureSet {
        &self.features
    }

    /// Shapes a run.
    ///
    /// On failure the run's output is left untouched.
    pub fn shape(&self, run: &mut Run) -> Result<()> {
        let script = self.script.or_else(|| run.guess_script()).unwrap_or(Script::Default);
        let direction = self.direction.unwrap_or_else(|| script.horizontal_direction());
        debug!(
            "shaping {} codepoints: script {}, language {}, {:?}, {} features",
            run.input().len(),
            script.tag(),
            self.language.tag(),
            direction,
            self.features.len()
        );

        let mut segment = Segment::with_capacity(run.input().len());
        for (cluster, &codepoint) in run.input().iter().enumerate() {
            let glyph_id = self.face.glyph_index(codepoint)?;
            segment.push(GlyphNode {
                glyph_id,
                codepoint,
                cluster: cluster as u32,
                class_flags: self.face.glyph_class(glyph_id),
                component_index: 0,
            });
        }

        let mut unsupported = Vec::new();
        if let Some(gsub) = &self.face.gsub {
            let lookups = self.lookups(gsub, script)?;
            let mut ctx = self.context(&mut segment, direction);
            apply_layout_table::<SubstLookup>(&mut ctx, gsub, &lookups, &mut unsupported)?;
        }

        let ids: Vec<NodeId> = segment.iter().collect();
        for id in ids {
            let advance = self.face.glyph_h_advance(segment.node(id).glyph_id);
            segment.position_mut(id).x_advance = advance;
        }

        if let Some(gpos) = &self.face.gpos {
            let lookups = self.lookups(gpos, script)?;
            let mut ctx = self.context(&mut segment, direction);
            apply_layout_table::<PosLookup>(&mut ctx, gpos, &lookups, &mut unsupported)?;
            propagate_attachment_offsets(&mut segment, direction);
        }

        run.set_output(&segment, unsupported);
        Ok(())
    }

    fn lookups(
        &self,
        table: &LayoutTable,
        script: Script,
    ) -> Result<Vec<(Option<Feature>, LookupIndex)>> {
        let lang_sys = choose_lang_sys(table, script.tag(), self.language.tag())?;
        collect_lookups(table, &lang_sys, &self.features)
    }

    fn context<'s>(&'s self, segment: &'s mut Segment, direction: Direction) -> ApplyContext<'s, 'f> {
        let mut ctx = ApplyContext::new(self.face, segment);
        ctx.direction = direction;
        ctx.joining = self.joining_neighbors;
        ctx.policy = self.policy;
        ctx
    }
}

/// Shapes a run with the given features enabled.
///
/// The script, language and direction are guessed.
pub fn shape(face: &Face, features: &[Feature], run: &mut Run) -> Result<()> {
    ShapingContext::new(face).features(features.iter().copied()).shape(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FaceTables;

    #[test]
    fn parse_settings() {
        assert_eq!(
            "liga".parse::<FeatureSetting>(),
            Ok(FeatureSetting { feature: Feature::Liga, enabled: true })
        );
        assert_eq!(
            "-kern".parse::<FeatureSetting>(),
            Ok(FeatureSetting { feature: Feature::Kern, enabled: false })
        );
        assert_eq!("+ss01".parse::<FeatureSetting>().map(|s| s.feature), Ok(Feature::Ss01));
        assert!("-".parse::<FeatureSetting>().is_err());
        assert!("zzzz".parse::<FeatureSetting>().is_err());
    }

    #[test]
    fn settings_toggle_features() {
        let face = Face::from_tables(FaceTables::default()).unwrap();
        let ctx = ShapingContext::new(&face)
            .feature(Feature::Liga)
            .feature(Feature::Liga)
            .feature(Feature::Kern)
            .setting("-kern".parse().unwrap());
        assert_eq!(ctx.enabled_features().len(), 1);
        assert!(ctx.enabled_features().contains(Feature::Liga));
    }

    #[test]
    fn missing_cmap() {
        let face = Face::from_tables(FaceTables::default()).unwrap();
        let mut run = Run::from_text("a");
        assert!(matches!(
            ShapingContext::new(&face).shape(&mut run),
            Err(crate::Error::TableNotFound(_))
        ));
        assert!(run.output().is_empty());

        // Nothing to map, nothing to fail on.
        let mut run = Run::new(Vec::new());
        ShapingContext::new(&face).shape(&mut run).unwrap();
        assert!(run.output().is_empty());
    }
}
