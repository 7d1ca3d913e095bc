//! Script, language system and feature resolution.

use log::debug;

use crate::bitset::FeatureSet;
use crate::tables::{FeatureIndex, LangSys, LayoutTable, LookupIndex};
use crate::{Error, Feature, Result, Tag};

const DEFAULT_LANGUAGE: Tag = Tag::from_bytes(b"dflt");

/// Finds the language system for a script and language.
///
/// The script must match exactly. An unknown language falls back to the
/// script's default language system.
pub fn choose_lang_sys<'a>(
    table: &LayoutTable<'a>,
    script: Tag,
    language: Tag,
) -> Result<LangSys<'a>> {
    let script_table = table.find_script(script)?.ok_or(Error::ScriptNotFound(script))?;

    let lang_sys = if language == DEFAULT_LANGUAGE {
        None
    } else {
        script_table.find_lang_sys(language)?
    };

    let lang_sys = match lang_sys {
        Some(lang_sys) => lang_sys,
        None => script_table
            .default_lang_sys()
            .ok_or(Error::LanguageSystemNotFound { script, language })?,
    };

    debug!(
        "{}: script {} language {} has {} features{}",
        table.tag(),
        script,
        language,
        lang_sys.feature_indices.len(),
        if lang_sys.required_feature.is_some() { " and a required feature" } else { "" },
    );

    Ok(lang_sys)
}

/// Lists the lookups of enabled features the language system references, plus its
/// required feature, in feature list order.
///
/// The required feature pairs with `None` when its tag is not a known feature.
pub fn collect_lookups(
    table: &LayoutTable,
    lang_sys: &LangSys,
    features: &FeatureSet,
) -> Result<Vec<(Option<Feature>, LookupIndex)>> {
    let mut lookups = Vec::new();
    for index in (0..table.feature_count()).map(FeatureIndex) {
        let required = lang_sys.required_feature == Some(index);
        if !required && !lang_sys.has_feature(index) {
            continue;
        }

        let feature = table.feature_tag(index).and_then(Feature::from_tag);
        if !required && !feature.is_some_and(|f| features.contains(f)) {
            continue;
        }

        let lookup_indices = table.feature(index)?.lookup_indices;
        lookups.extend(lookup_indices.into_iter().map(|lookup| (feature, lookup)));
    }

    debug!("{}: {} lookups to apply", table.tag(), lookups.len());
    Ok(lookups)
}
