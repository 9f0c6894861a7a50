//! Built-in profiles for the three mainstream blockers.

use std::collections::BTreeMap;

use lf_core::Features;

use crate::profile::TargetProfile;
use crate::steps::{FilterStep, RewriteStep};

/// Syntax uBlock Origin understands and Adblock Plus does not.
const UBO_ONLY_SYNTAX: &[&str] = &[
    "$removeparam",
    "$removeheader",
    ":style(",
    ":remove()",
    "##^",
    "##+js(",
    "##script:inject(",
];

fn base_filters() -> Vec<FilterStep> {
    vec![FilterStep::NonEmpty, FilterStep::UsefulComments]
}

pub fn ublock_origin() -> TargetProfile {
    TargetProfile {
        additional_header: Some(
            "! This list is optimized for uBlock Origin\n\
             ! uBlock Origin supports advanced syntax and network filtering\n\
             ! For best results, use with uBlock Origin v1.40.0 or later"
                .to_string(),
        ),
        rewrite_chain: vec![RewriteStep::Normalize],
        filter_chain: base_filters(),
        features: Features::BASELINE
            | Features::SCRIPTLET_INJECTION
            | Features::REDIRECT_DIRECTIVES
            | Features::REMOVE_PARAM
            | Features::CSP,
        ..TargetProfile::new(
            "uBlock Origin",
            "Adblock List for uBlock Origin",
            "Comprehensive adblock list optimized for uBlock Origin",
        )
    }
}

pub fn adblock_plus() -> TargetProfile {
    let mut filters = base_filters();
    filters.push(FilterStep::RejectContaining {
        patterns: UBO_ONLY_SYNTAX.iter().map(|s| s.to_string()).collect(),
    });

    TargetProfile {
        additional_header: Some(
            "! This list is compatible with Adblock Plus\n\
             ! Adblock Plus syntax and features supported\n\
             ! For best results, use with Adblock Plus v3.10 or later"
                .to_string(),
        ),
        rewrite_chain: vec![
            RewriteStep::Normalize,
            RewriteStep::StripModifier {
                name: "redirect".to_string(),
            },
            RewriteStep::DropWithModifier {
                name: "removeparam".to_string(),
            },
        ],
        filter_chain: filters,
        features: Features::BASELINE | Features::CSP,
        ..TargetProfile::new(
            "Adblock Plus 3.18",
            "Adblock List for Adblock Plus",
            "Comprehensive adblock list compatible with Adblock Plus",
        )
    }
}

pub fn adguard() -> TargetProfile {
    TargetProfile {
        additional_header: Some(
            "! This list is optimized for AdGuard products\n\
             ! AdGuard supports extended syntax and advanced filtering\n\
             ! Compatible with AdGuard Browser Extension, AdGuard for Windows/Mac/Android/iOS"
                .to_string(),
        ),
        rewrite_chain: vec![RewriteStep::Normalize],
        filter_chain: base_filters(),
        features: Features::all(),
        ..TargetProfile::new(
            "AdGuard",
            "Adblock List for AdGuard",
            "Comprehensive adblock list optimized for AdGuard products",
        )
    }
}

/// All presets keyed by the name used in configuration and file names.
pub fn builtin_profiles() -> BTreeMap<String, TargetProfile> {
    BTreeMap::from([
        ("adblock_plus".to_string(), adblock_plus()),
        ("adguard".to_string(), adguard()),
        ("ublock_origin".to_string(), ublock_origin()),
    ])
}
