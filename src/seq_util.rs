//! DNA sequence utilities
//!

/// Complement lookup for all byte values
///
/// Both cases of the 4 standard bases and the IUPAC ambiguity codes are complemented with case
/// preserved. 'N' and all other values map to themselves.
///
const COMPLEMENT_LUT: [u8; 256] = {
    const PAIRS: [(u8, u8); 10] = [
        (b'A', b'T'),
        (b'C', b'G'),
        (b'R', b'Y'),
        (b'K', b'M'),
        (b'B', b'V'),
        (b'D', b'H'),
        (b'S', b'S'),
        (b'W', b'W'),
        (b'N', b'N'),
        (b'U', b'A'),
    ];
    let mut x = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        x[i] = i as u8;
        i += 1;
    }
    let mut i = 0;
    while i < PAIRS.len() {
        let (a, b) = PAIRS[i];
        // Uracil is complemented without becoming a complement target
        if a != b'U' {
            x[b as usize] = a;
            x[(b + 32) as usize] = a + 32;
        }
        x[a as usize] = b;
        x[(a + 32) as usize] = b + 32;
        i += 1;
    }
    x
};

pub fn complement_base(base: u8) -> u8 {
    COMPLEMENT_LUT[base as usize]
}

pub fn rev_comp_in_place(dna: &mut [u8]) {
    dna.reverse();
    for base in dna.iter_mut() {
        *base = complement_base(*base);
    }
}

#[cfg(test)]
pub fn rev_comp(dna: &[u8]) -> Vec<u8> {
    dna.iter().rev().map(|&x| complement_base(x)).collect()
}
