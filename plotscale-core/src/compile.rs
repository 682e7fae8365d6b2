//! Scale compilation entry points.
//!
//! `compile_scales` groups channels by the scale they reference, builds one
//! descriptor per referenced or declared scale, and returns them keyed in
//! first-reference order. `scale` builds a single standalone descriptor from
//! options alone.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use plotscale_common::{PlotScaleError, Result};

use crate::channel::Channel;
use crate::scales::descriptor::ScaleDescriptor;
use crate::scales::factory::build_scale;
use crate::scales::registry::{ScaleName, IMPLICIT_DOMAIN_LIMIT};
use crate::spec::plot::PlotOptionsSpec;
use crate::spec::scale::ScaleOptionsSpec;

/// The compiled scales of one plot, keyed in first-reference order:
/// channel-referenced scales first (in channel order), then scales declared
/// in options only (in registry order).
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleMap {
    entries: Vec<(ScaleName, ScaleDescriptor)>,
}

impl ScaleMap {
    /// Looks up a descriptor by scale name. A registered name that no
    /// channel or option referenced yields `Ok(None)`; an unregistered name
    /// is an error.
    pub fn scale(&self, name: &str) -> Result<Option<&ScaleDescriptor>> {
        let name = ScaleName::parse(name)?;
        Ok(self
            .entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, descriptor)| descriptor))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScaleName, &ScaleDescriptor)> {
        self.entries.iter().map(|(name, descriptor)| (*name, descriptor))
    }

    pub fn names(&self) -> impl Iterator<Item = ScaleName> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ScaleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, descriptor) in &self.entries {
            map.serialize_entry(name.as_str(), descriptor)?;
        }
        map.end()
    }
}

/// Compiles every scale referenced by `channels` or declared in `options`.
pub fn compile_scales(channels: &[Channel], options: &PlotOptionsSpec) -> Result<ScaleMap> {
    compile_scales_with_limit(channels, options, IMPLICIT_DOMAIN_LIMIT)
}

/// `compile_scales` with an explicit implicit-ordinal-domain bound.
pub fn compile_scales_with_limit(
    channels: &[Channel],
    options: &PlotOptionsSpec,
    limit: usize,
) -> Result<ScaleMap> {
    let mut groups: Vec<(ScaleName, Vec<&Channel>)> = Vec::new();
    for channel in channels {
        let Some(name) = channel.resolved_scale()? else {
            continue;
        };
        match groups.iter_mut().find(|(entry, _)| *entry == name) {
            Some((_, members)) => members.push(channel),
            None => groups.push((name, vec![channel])),
        }
    }
    for declared in options.declared_scales() {
        let name = ScaleName::parse(declared)?;
        if !groups.iter().any(|(entry, _)| *entry == name) {
            groups.push((name, Vec::new()));
        }
    }

    let dims = options.dimensions();
    let default_options = ScaleOptionsSpec::default();
    let mut entries = Vec::with_capacity(groups.len());
    for (name, members) in groups {
        let scale_options = options.options_for(name.as_str()).unwrap_or(&default_options);
        if members.is_empty() && scale_options.is_empty() {
            return Err(PlotScaleError::invalid_definition(format!(
                "nothing to infer for the {name} scale"
            )));
        }
        let descriptor = build_scale(name, scale_options, &members, &dims, limit)?;
        entries.push((name, descriptor));
    }
    Ok(ScaleMap { entries })
}

/// Builds a single standalone descriptor from options alone. Exactly one
/// scale must be declared.
pub fn scale(options: &PlotOptionsSpec) -> Result<ScaleDescriptor> {
    let declared = options.declared_scales();
    let [name] = declared.as_slice() else {
        return Err(PlotScaleError::invalid_definition(format!(
            "exactly one scale definition is required, received {}",
            declared.len()
        )));
    };
    let name = ScaleName::parse(name)?;
    let scale_options = options
        .options_for(name.as_str())
        .ok_or_else(|| PlotScaleError::internal("declared scale is missing its options"))?;
    build_scale(
        name,
        scale_options,
        &[],
        &options.dimensions(),
        IMPLICIT_DOMAIN_LIMIT,
    )
}
