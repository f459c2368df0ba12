//! Minimal parser for protein-level HGVS strings as found in the mutation
//! table (`p.R175H`, `p.Arg175His`, `p.R213*`, `p.K1690fs*10`, ...).
//!
//! Only the parts needed for positional statistics are extracted: the kind
//! of change and the first affected residue position.

/// Kind of protein change described by an HGVS string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Missense,
    Nonsense,
    Synonymous,
    Frameshift,
    InFrameIndel,
    StopLoss,
    /// Position is known but the effect is not (`p.R175?`).
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AminoAcidChange {
    pub hgvs: String,
    pub is_valid: bool,
    pub kind: MutationKind,
    /// One-letter code of the reference residue; `*` for a stop codon.
    pub reference: Option<char>,
    /// One-letter code of the alternate residue for substitutions.
    pub alternate: Option<char>,
    /// First affected residue (1-based).
    pub pos: Option<u32>,
}

const ONE_LETTER: &str = "ACDEFGHIKLMNPQRSTVWYUOX*";

const THREE_LETTER: [(&str, char); 24] = [
    ("Ala", 'A'),
    ("Arg", 'R'),
    ("Asn", 'N'),
    ("Asp", 'D'),
    ("Cys", 'C'),
    ("Gln", 'Q'),
    ("Glu", 'E'),
    ("Gly", 'G'),
    ("His", 'H'),
    ("Ile", 'I'),
    ("Leu", 'L'),
    ("Lys", 'K'),
    ("Met", 'M'),
    ("Phe", 'F'),
    ("Pro", 'P'),
    ("Ser", 'S'),
    ("Thr", 'T'),
    ("Trp", 'W'),
    ("Tyr", 'Y'),
    ("Val", 'V'),
    ("Sec", 'U'),
    ("Pyl", 'O'),
    ("Xaa", 'X'),
    ("Ter", '*'),
];

impl AminoAcidChange {
    pub fn parse(hgvs: &str) -> Self {
        match parse_body(hgvs) {
            Some(parsed) => AminoAcidChange {
                hgvs: hgvs.to_string(),
                is_valid: true,
                kind: parsed.kind,
                reference: parsed.reference,
                alternate: parsed.alternate,
                pos: parsed.pos,
            },
            None => AminoAcidChange::invalid(hgvs),
        }
    }

    fn invalid(hgvs: &str) -> Self {
        AminoAcidChange {
            hgvs: hgvs.to_string(),
            is_valid: false,
            kind: MutationKind::Unknown,
            reference: None,
            alternate: None,
            pos: None,
        }
    }

    pub fn is_missense(&self) -> bool {
        self.is_valid && self.kind == MutationKind::Missense
    }
}

struct Parsed {
    kind: MutationKind,
    reference: Option<char>,
    alternate: Option<char>,
    pos: Option<u32>,
}

fn parse_body(hgvs: &str) -> Option<Parsed> {
    let trimmed = hgvs.trim();
    let body = trimmed.strip_prefix("p.").unwrap_or(trimmed);
    let body = body
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(body);

    if body == "=" {
        return Some(Parsed {
            kind: MutationKind::Synonymous,
            reference: None,
            alternate: None,
            pos: None,
        });
    }

    let (reference, consumed) = parse_residue(body)?;
    let rest = &body[consumed..];
    let (pos, consumed) = parse_position(rest)?;
    let rest = &rest[consumed..];

    if let Some(range_end) = rest.strip_prefix('_') {
        let (_, consumed) = parse_residue(range_end)?;
        let (_, digits) = parse_position(&range_end[consumed..])?;
        let effect = &range_end[consumed + digits..];
        let kind = if effect.contains("fs") {
            MutationKind::Frameshift
        } else if is_indel(effect) {
            MutationKind::InFrameIndel
        } else {
            return None;
        };
        return Some(Parsed {
            kind,
            reference: Some(reference),
            alternate: None,
            pos: Some(pos),
        });
    }

    let single = |kind: MutationKind, alternate: Option<char>| {
        Some(Parsed {
            kind,
            reference: Some(reference),
            alternate,
            pos: Some(pos),
        })
    };

    if rest.contains("fs") {
        return single(MutationKind::Frameshift, None);
    }
    if is_indel(rest) {
        return single(MutationKind::InFrameIndel, None);
    }
    match rest {
        "=" => return single(MutationKind::Synonymous, Some(reference)),
        "?" => return single(MutationKind::Unknown, None),
        _ => {}
    }

    let (alternate, consumed) = parse_residue(rest)?;
    let tail = &rest[consumed..];
    if !(tail.is_empty() || tail.starts_with("ext")) {
        return None;
    }

    let is_stop = |residue: char| residue == '*' || residue == 'X';
    let kind = match (is_stop(reference), is_stop(alternate)) {
        (true, true) => MutationKind::Synonymous,
        (true, false) => MutationKind::StopLoss,
        (false, true) => MutationKind::Nonsense,
        (false, false) if alternate == reference => MutationKind::Synonymous,
        (false, false) => MutationKind::Missense,
    };
    single(kind, Some(alternate))
}

fn is_indel(effect: &str) -> bool {
    ["delins", "del", "dup", "ins"]
        .iter()
        .any(|tag| effect.starts_with(tag))
}

/// Parse a residue at the start of `s`, returning its one-letter code and
/// the number of bytes consumed.
fn parse_residue(s: &str) -> Option<(char, usize)> {
    if let Some(prefix) = s.get(..3) {
        if let Some(&(_, code)) = THREE_LETTER.iter().find(|(name, _)| *name == prefix) {
            return Some((code, 3));
        }
    }
    let first = s.chars().next()?;
    if ONE_LETTER.contains(first) {
        Some((first, first.len_utf8()))
    } else {
        None
    }
}

fn parse_position(s: &str) -> Option<(u32, usize)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let pos = s[..digits].parse::<u32>().ok()?;
    if pos == 0 {
        return None;
    }
    Some((pos, digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_and_pos(hgvs: &str) -> (MutationKind, Option<u32>) {
        let aa = AminoAcidChange::parse(hgvs);
        assert!(aa.is_valid, "{} should parse", hgvs);
        (aa.kind, aa.pos)
    }

    #[test]
    fn substitutions() {
        assert_eq!(kind_and_pos("p.R175H"), (MutationKind::Missense, Some(175)));
        assert_eq!(kind_and_pos("p.Arg175His"), (MutationKind::Missense, Some(175)));
        assert_eq!(kind_and_pos("p.V600E"), (MutationKind::Missense, Some(600)));
        assert_eq!(kind_and_pos("p.(G12D)"), (MutationKind::Missense, Some(12)));
        assert_eq!(kind_and_pos("p.R213*"), (MutationKind::Nonsense, Some(213)));
        assert_eq!(kind_and_pos("p.Arg213Ter"), (MutationKind::Nonsense, Some(213)));
        assert_eq!(kind_and_pos("p.R213X"), (MutationKind::Nonsense, Some(213)));
        assert_eq!(kind_and_pos("p.T125T"), (MutationKind::Synonymous, Some(125)));
        assert_eq!(kind_and_pos("p.T125="), (MutationKind::Synonymous, Some(125)));
        assert_eq!(kind_and_pos("p.*394Qext*17"), (MutationKind::StopLoss, Some(394)));
    }

    #[test]
    fn indels_and_frameshifts() {
        assert_eq!(kind_and_pos("p.K1690fs*10"), (MutationKind::Frameshift, Some(1690)));
        assert_eq!(kind_and_pos("p.Lys1690AsnfsTer10"), (MutationKind::Frameshift, Some(1690)));
        assert_eq!(kind_and_pos("p.E746_A750del"), (MutationKind::InFrameIndel, Some(746)));
        assert_eq!(kind_and_pos("p.A767_V769dup"), (MutationKind::InFrameIndel, Some(767)));
        assert_eq!(kind_and_pos("p.L858del"), (MutationKind::InFrameIndel, Some(858)));
        assert_eq!(kind_and_pos("p.R175?"), (MutationKind::Unknown, Some(175)));
    }

    #[test]
    fn synonymous_without_position() {
        let aa = AminoAcidChange::parse("p.=");
        assert!(aa.is_valid);
        assert_eq!(aa.kind, MutationKind::Synonymous);
        assert_eq!(aa.pos, None);
    }

    #[test]
    fn invalid_strings() {
        for hgvs in ["", "p.", "p.?", "c.524G>A", "p.R0H", "p.R175", "p.R175Hxyz", "unknown"] {
            let aa = AminoAcidChange::parse(hgvs);
            assert!(!aa.is_valid, "{} should be invalid", hgvs);
            assert_eq!(aa.pos, None);
        }
    }

    #[test]
    fn missense_helper() {
        assert!(AminoAcidChange::parse("p.G12V").is_missense());
        assert!(!AminoAcidChange::parse("p.G12*").is_missense());
        assert!(!AminoAcidChange::parse("garbage").is_missense());
    }
}
