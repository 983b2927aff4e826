//! Enemy name resolution.
//!
//! ATTACK and HIJACK orders name their target species in one of three ways:
//! directly by number (`SP12`, `SP 12`), by the obfuscated `#<hex>` code
//! shown in reports, or by name. Names are matched approximately so that
//! small misspellings still resolve, but a match that is too weak or tied
//! with another species is refused.

use crate::galaxy::{Galaxy, SpeciesId};

/// Score awarded to an exact (case-insensitive) name match.
pub const EXACT_MATCH_SCORE: i32 = 10_000;

/// Scores how closely `unknown` matches `correct`. Higher is closer.
///
/// Both strings are compared as given; callers uppercase them first. An
/// inexact match scores the length of their longest common subsequence,
/// less one point per character `unknown` has beyond `correct`'s length.
pub fn score(correct: &str, unknown: &str) -> i32 {
    if correct == unknown {
        return EXACT_MATCH_SCORE;
    }
    let a: Vec<char> = correct.chars().collect();
    let b: Vec<char> = unknown.chars().collect();
    let overrun = b.len().saturating_sub(a.len());
    common_subsequence_len(&a, &b) as i32 - overrun as i32
}

fn common_subsequence_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Lowest score accepted for a best match whose name is `len` characters.
pub fn minimum_score(len: usize) -> i32 {
    len as i32 - (len as i32 / 7 + 1)
}

/// Encodes a species id in the report form `#<hex>`.
pub fn encode_species(id: SpeciesId, key: u32) -> String {
    format!("#{:x}", u32::from(id.0) ^ key)
}

/// Resolves an enemy reference to a species id.
///
/// Returns `None` when the reference is unknown or ambiguous.
pub fn resolve_species(galaxy: &Galaxy, reference: &str) -> Option<SpeciesId> {
    let reference = reference.trim();
    if let Some(id) = direct_reference(reference, galaxy.obfuscation_key) {
        return galaxy.species.contains(id).then_some(id);
    }
    fuzzy_match(galaxy, strip_class(reference))
}

/// Parses `SP<n>`, `SP <n>`, or `#<hex>`.
fn direct_reference(reference: &str, key: u32) -> Option<SpeciesId> {
    if let Some(code) = reference.strip_prefix('#') {
        let raw = u32::from_str_radix(code, 16).ok()? ^ key;
        return u16::try_from(raw).ok().map(SpeciesId);
    }
    let rest = class_prefix(reference)?.trim_start();
    if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
        return rest.parse::<u16>().ok().map(SpeciesId);
    }
    None
}

/// Returns the text after a leading `SP` class abbreviation.
fn class_prefix(reference: &str) -> Option<&str> {
    let head = reference.get(..2)?;
    head.eq_ignore_ascii_case("SP").then(|| &reference[2..])
}

/// Drops a leading `SP ` class word before a free-text name.
fn strip_class(reference: &str) -> &str {
    match class_prefix(reference) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => reference,
    }
}

fn fuzzy_match(galaxy: &Galaxy, name: &str) -> Option<SpeciesId> {
    let wanted = name.to_uppercase();
    let mut best_score = i32::MIN;
    let mut second_score = i32::MIN;
    let mut best: Option<(SpeciesId, usize)> = None;

    for species in galaxy.species.active() {
        let candidate = species.name.to_uppercase();
        let s = score(&candidate, &wanted);
        if s > best_score {
            second_score = best_score;
            best_score = s;
            best = Some((species.id, candidate.chars().count()));
        } else if s > second_score {
            second_score = s;
        }
    }

    let (id, len) = best?;
    if best_score < minimum_score(len) || best_score == second_score {
        tracing::debug!(name, best_score, second_score, "species name not resolved");
        return None;
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::Species;

    fn galaxy(names: &[&str]) -> Galaxy {
        let mut g = Galaxy::new();
        for (i, name) in names.iter().enumerate() {
            g.species.insert(Species::new(SpeciesId(i as u16 + 1), *name));
        }
        g
    }

    #[test]
    fn score_prefers_exact_match() {
        assert_eq!(score("ABC", "ABC"), EXACT_MATCH_SCORE);
        assert_eq!(score("ABD", "ABC"), 2);
        assert_eq!(score("XYZ", "ABC"), 0);
    }

    #[test]
    fn score_penalizes_extra_characters() {
        assert_eq!(score("ABC", "ABXC"), 2);
        assert_eq!(score("ABC", "ABCDEFG"), -1);
    }

    #[test]
    fn minimum_score_allows_one_slip_per_seven_letters() {
        assert_eq!(minimum_score(3), 2);
        assert_eq!(minimum_score(7), 5);
        assert_eq!(minimum_score(14), 11);
    }

    #[test]
    fn exact_name_beats_near_neighbour() {
        let g = galaxy(&["ABC", "ABD", "XYZ"]);
        assert_eq!(resolve_species(&g, "ABC"), Some(SpeciesId(1)));
        assert_eq!(resolve_species(&g, "abd"), Some(SpeciesId(2)));
    }

    #[test]
    fn equidistant_name_is_ambiguous() {
        let g = galaxy(&["ABC", "ABD", "XYZ"]);
        assert_eq!(resolve_species(&g, "ABE"), None);
    }

    #[test]
    fn misspelling_resolves() {
        let g = galaxy(&["Zorgons", "Humans", "Klingons"]);
        assert_eq!(resolve_species(&g, "Klingon"), Some(SpeciesId(3)));
        assert_eq!(resolve_species(&g, "SP Humens"), Some(SpeciesId(2)));
        assert_eq!(resolve_species(&g, "Vulcans"), None);
    }

    #[test]
    fn inactive_species_are_not_matched_by_name() {
        let mut g = galaxy(&["Zorgons", "Humans"]);
        if let Some(sp) = g.species.get_mut(SpeciesId(1)) {
            sp.active = false;
        }
        assert_eq!(resolve_species(&g, "Zorgons"), None);
    }

    #[test]
    fn direct_number_reference() {
        let g = galaxy(&["Zorgons", "Humans"]);
        assert_eq!(resolve_species(&g, "SP2"), Some(SpeciesId(2)));
        assert_eq!(resolve_species(&g, "sp 1"), Some(SpeciesId(1)));
        assert_eq!(resolve_species(&g, "SP 9"), None);
    }

    #[test]
    fn obfuscated_reference_decodes_with_key() {
        let mut g = galaxy(&["Zorgons", "Humans"]);
        g.obfuscation_key = 0x5a17;
        let code = encode_species(SpeciesId(2), g.obfuscation_key);
        assert_eq!(resolve_species(&g, &code), Some(SpeciesId(2)));
        assert_eq!(resolve_species(&g, "#zz"), None);
    }
}
