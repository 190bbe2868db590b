//! Reversible party codes for sharing a match seed.
//! Code format: <WORD><NN>, e.g., ROSES42, ARROW07

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// Word list for party codes
pub const WORD_LIST: [&str; 64] = [
    "ROSES", "ARROW", "CUPID", "HEART", "CRUSH", "DARE", "BLUSH", "SWOON", "CANDY", "VELVET",
    "LOCKET", "SONNET", "TULIP", "PEONY", "CHERRY", "HONEY", "SUGAR", "COCOA", "TRUFFLE", "KISSES",
    "LETTER", "POEMS", "VALENT", "DATES", "DINNER", "DANCE", "TANGO", "WALTZ", "MOON", "STARS",
    "COMET", "ORBIT", "GLITCH", "PIXEL", "SPRITE", "CACHE", "BUFFER", "SIGNAL", "STATIC", "REBOOT",
    "DELULU", "SIMP", "RIZZ", "GHOST", "SLIDE", "EMOJI", "STORY", "SELFIE", "PROOF", "PENALTY",
    "SKIP", "STREAK", "ROUND", "SPIN", "WHEEL", "LUCKY", "FATE", "DESTINY", "SPARK", "FLAME",
    "EMBER", "BLAZE", "HALO", "WINGS",
];

const WORD_MASK: u16 = 0x01FF;
const NN_MASK: u16 = 0x7F;
const NN_SHIFT: u16 = 9;
const FALLBACK_WORD: &str = "ROSES";

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & WORD_MASK | ((u16::from(nn) & NN_MASK) << NN_SHIFT)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    let nn = u8::try_from((packed >> NN_SHIFT) & NN_MASK).unwrap_or(0);
    (packed & WORD_MASK, nn)
}

fn compose_seed(word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    // Domain-separated FNV input
    let [lo, hi] = packed.to_le_bytes();
    let mut buf = [0u8; 9];
    buf[..6].copy_from_slice(b"CUPID-");
    buf[6] = lo;
    buf[7] = hi;
    buf[8] = 0xA5;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render the party code for a seed.
#[must_use]
pub fn encode_party_code(seed: u64) -> String {
    let packed = u16::try_from(seed & 0xFFFF).unwrap_or(0);
    let (wi, mut nn) = unpack(packed);
    let word = WORD_LIST
        .get(usize::from(wi))
        .copied()
        .unwrap_or(FALLBACK_WORD);
    if nn > 99 {
        nn %= 100;
    }
    format!("{word}{nn:02}")
}

/// Seed for a party code. Case and punctuation in the word are ignored.
#[must_use]
pub fn decode_party_code(code: &str) -> Option<u64> {
    let s = code.trim();
    if s.len() < 3 || !s.is_ascii() {
        return None;
    }
    let (word_part, nn_part) = s.split_at(s.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some(compose_seed(wi, nn))
}

/// Fresh party code from caller-supplied entropy.
#[must_use]
pub fn generate_party_code(entropy: u64) -> String {
    let word_count = u64::try_from(WORD_LIST.len()).unwrap_or(1);
    let wi = u16::try_from(entropy % word_count).unwrap_or(0);
    let nn = u8::try_from((entropy >> 17) % 100).unwrap_or(0);
    encode_party_code(compose_seed(wi, nn))
}

/// Interpret user seed input: a decimal integer or a party code.
#[must_use]
pub fn parse_seed_input(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| decode_party_code(trimmed))
}
