//! Tag Normalizer: local-name derivation and the one required rename
//!
//! Output keys are always local names, stripped of their namespace prefix,
//! with a single documented exception for Microsoft's `Rating` property,
//! which several writers emit under numbered prefix variants.

use crate::core::dom::local_name;

/// Derives the output key for `qname`: its local name, unless `qname`
/// matches `MicrosoftPhoto(_\d+_)?:Rating` (case-insensitive), which always
/// normalizes to `RatingPercent` regardless of which numbered prefix
/// variant produced it.
pub fn normalize_local_name(qname: &str) -> String {
    if is_microsoft_rating(qname) {
        "RatingPercent".to_string()
    } else {
        local_name(qname).to_string()
    }
}

fn is_microsoft_rating(qname: &str) -> bool {
    let Some((prefix, local)) = qname.split_once(':') else {
        return false;
    };
    if !local.eq_ignore_ascii_case("Rating") {
        return false;
    }
    let prefix = prefix.to_ascii_lowercase();
    if prefix == "microsoftphoto" {
        return true;
    }
    let Some(middle) = prefix.strip_prefix("microsoftphoto_").and_then(|s| s.strip_suffix('_')) else {
        return false;
    };
    !middle.is_empty() && middle.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_qname_strips_prefix() {
        assert_eq!(normalize_local_name("dc:title"), "title");
    }

    #[test]
    fn qname_without_prefix_passes_through() {
        assert_eq!(normalize_local_name("title"), "title");
    }

    #[test]
    fn microsoft_rating_renames() {
        assert_eq!(normalize_local_name("MicrosoftPhoto:Rating"), "RatingPercent");
    }

    #[test]
    fn numbered_microsoft_rating_variant_renames() {
        assert_eq!(normalize_local_name("MicroSoftPhoto_1_:Rating"), "RatingPercent");
        assert_eq!(normalize_local_name("microsoftphoto_42_:rating"), "RatingPercent");
    }

    #[test]
    fn unrelated_rating_like_tag_is_not_renamed() {
        assert_eq!(normalize_local_name("xmp:Rating"), "Rating");
    }
}
