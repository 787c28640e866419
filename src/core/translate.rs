//! Known-tag translation tables
//!
//! Scalar description synthesis consults a per-tag translator, indexed by
//! the *original* qualified name. The only mapping required is
//! `tiff:Orientation`; the rest follows the standard EXIF translation
//! table, here a small representative subset; unknown values pass through
//! verbatim, as do unknown tags.

/// Rewrites `raw` for `qname` if a translation is known, otherwise returns
/// `raw` unchanged.
pub fn translate_scalar(qname: &str, raw: &str) -> Option<&'static str> {
    match qname {
        "tiff:Orientation" => orientation(raw),
        "exif:ExposureProgram" => exposure_program(raw),
        "exif:MeteringMode" => metering_mode(raw),
        "exif:WhiteBalance" => white_balance(raw),
        "exif:Flash" => flash(raw),
        "tiff:ResolutionUnit" => resolution_unit(raw),
        "tiff:YCbCrPositioning" => ycbcr_positioning(raw),
        _ => None,
    }
}

/// `tiff:Orientation` — the canonical required mapping. `"3"` ⇒
/// `"Rotate 180"`; the remaining values follow the standard EXIF
/// orientation table.
fn orientation(raw: &str) -> Option<&'static str> {
    Some(match raw {
        "1" => "Horizontal (normal)",
        "2" => "Mirror horizontal",
        "3" => "Rotate 180",
        "4" => "Mirror vertical",
        "5" => "Mirror horizontal and rotate 270 CW",
        "6" => "Rotate 90 CW",
        "7" => "Mirror horizontal and rotate 90 CW",
        "8" => "Rotate 270 CW",
        _ => return None,
    })
}

fn exposure_program(raw: &str) -> Option<&'static str> {
    Some(match raw {
        "0" => "Not defined",
        "1" => "Manual",
        "2" => "Normal program",
        "3" => "Aperture priority",
        "4" => "Shutter priority",
        "5" => "Creative program",
        "6" => "Action program",
        "7" => "Portrait mode",
        "8" => "Landscape mode",
        _ => return None,
    })
}

fn metering_mode(raw: &str) -> Option<&'static str> {
    Some(match raw {
        "0" => "Unknown",
        "1" => "Average",
        "2" => "Center-weighted average",
        "3" => "Spot",
        "4" => "Multi-spot",
        "5" => "Pattern",
        "6" => "Partial",
        "255" => "Other",
        _ => return None,
    })
}

fn white_balance(raw: &str) -> Option<&'static str> {
    Some(match raw {
        "0" => "Auto",
        "1" => "Manual",
        _ => return None,
    })
}

fn flash(raw: &str) -> Option<&'static str> {
    Some(match raw {
        "0" => "No flash",
        "1" => "Flash fired",
        "5" => "Flash fired, return not detected",
        "7" => "Flash fired, return detected",
        "9" => "Flash fired, compulsory",
        "16" => "No flash function",
        "24" => "No flash, auto mode",
        "25" => "Flash fired, auto mode",
        _ => return None,
    })
}

fn resolution_unit(raw: &str) -> Option<&'static str> {
    Some(match raw {
        "1" => "No absolute unit",
        "2" => "Inches",
        "3" => "Centimeters",
        _ => return None,
    })
}

fn ycbcr_positioning(raw: &str) -> Option<&'static str> {
    Some(match raw {
        "1" => "Centered",
        "2" => "Co-sited",
        _ => return None,
    })
}

/// Per-tag array translator extension point: a tag-specific override of the
/// default comma-joined array description. None of the tags this crate
/// knows about need one, so this always defers to the default, but the
/// hook exists so a future tag-specific rendering (e.g. a structured
/// `CreatorContactInfo` list) has somewhere to plug in without touching the
/// RDF Interpreter.
pub fn translate_array(_qname: &str, _items: &[crate::core::tag::ArrayItem]) -> Option<String> {
    None
}

/// IPTC Core Creator Contact Info key rename table. Applied to every
/// structure field key during description synthesis,
/// not just when the structure is literally `Iptc4xmpCore:CreatorContactInfo`
/// — the `Ci*` keys are specific enough that this is unambiguous.
pub fn rename_structure_key(local_key: &str) -> &str {
    match local_key {
        "CiAdrCity" => "CreatorCity",
        "CiAdrCtry" => "CreatorCountry",
        "CiAdrExtadr" => "CreatorAddress",
        "CiAdrPcode" => "CreatorPostalCode",
        "CiAdrRegion" => "CreatorRegion",
        "CiEmailWork" => "CreatorWorkEmail",
        "CiTelWork" => "CreatorWorkPhone",
        "CiUrlWork" => "CreatorWorkUrl",
        other => other,
    }
}
