//! Maven version ordering and pre-release detection.
//!
//! Follows the spirit of Maven's ComparableVersion: versions split on `.`
//! and `-`, numeric segments compare numerically, and the well-known
//! qualifiers rank alpha < beta < milestone < rc < snapshot < release < sp.

use std::cmp::Ordering;

const RANK_SNAPSHOT: u8 = 4;
const RANK_RELEASE: u8 = 5;

#[derive(Debug, PartialEq, Eq)]
enum Segment {
    Numeric(u64),
    Qualifier { rank: u8, number: Option<u64>, raw: String },
}

fn qualifier_rank(qualifier: &str) -> u8 {
    match qualifier {
        "alpha" | "a" => 0,
        "beta" | "b" => 1,
        "milestone" | "m" => 2,
        "rc" | "cr" => 3,
        "snapshot" => RANK_SNAPSHOT,
        "" | "final" | "ga" | "release" => RANK_RELEASE,
        "sp" => 6,
        // Unknown qualifiers (jre, jakarta, ...) sort above the known set.
        _ => 7,
    }
}

fn parse_segment(raw: &str) -> Segment {
    if let Ok(n) = raw.parse::<u64>() {
        return Segment::Numeric(n);
    }
    let lower = raw.to_lowercase();
    let digits_at = lower
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(lower.len());
    let (word, digits) = lower.split_at(digits_at);
    Segment::Qualifier {
        rank: qualifier_rank(word),
        number: digits.parse::<u64>().ok(),
        raw: lower,
    }
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    match (parse_segment(a), parse_segment(b)) {
        (Segment::Numeric(an), Segment::Numeric(bn)) => an.cmp(&bn),
        // A numeric segment counts as "past the release": 1.0-1 > 1.0,
        // 1.0.1 > 1.0-rc1. Only sp and unknown qualifiers outrank it.
        (Segment::Numeric(_), Segment::Qualifier { rank, .. }) => {
            if rank <= RANK_RELEASE {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (Segment::Qualifier { rank, .. }, Segment::Numeric(_)) => {
            if rank <= RANK_RELEASE {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (
            Segment::Qualifier { rank: ar, number: an, raw: araw },
            Segment::Qualifier { rank: br, number: bn, raw: braw },
        ) => ar
            .cmp(&br)
            .then_with(|| an.unwrap_or(0).cmp(&bn.unwrap_or(0)))
            // Known qualifiers with equal rank and number are aliases
            // (final/ga/release); only unknown ones fall back to text.
            .then_with(|| if ar == 7 { araw.cmp(&braw) } else { Ordering::Equal }),
    }
}

fn split_version(version: &str) -> Vec<&str> {
    version
        .split(['.', '-'])
        .filter(|s| !s.is_empty())
        .collect()
}

/// Compares two Maven version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_parts = split_version(a);
    let b_parts = split_version(b);

    let max_len = a_parts.len().max(b_parts.len());
    for i in 0..max_len {
        let ap = a_parts.get(i).copied().unwrap_or("");
        let bp = b_parts.get(i).copied().unwrap_or("");
        let ord = compare_segment(ap, bp);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Whether any segment of the version is a pre-release qualifier
/// (SNAPSHOT, alpha, beta, rc, milestone).
pub fn is_prerelease(version: &str) -> bool {
    split_version(version).iter().any(|part| {
        matches!(
            parse_segment(part),
            Segment::Qualifier { rank, .. } if rank <= RANK_SNAPSHOT
        )
    })
}

/// The newest version in the list, optionally restricted to stable
/// releases.
pub fn latest<'a, I>(versions: I, stable_only: bool) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .filter(|v| !stable_only || !is_prerelease(v))
        .max_by(|a, b| compare_versions(a, b))
}
