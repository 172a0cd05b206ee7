//! IUPAC nucleotide ambiguity algebra.
//!
//! Every symbol is a 4-bit set over {A, C, G, T}: A=0001, C=0010, G=0100, T=1000.
//! Combining two symbols is a set union, complementing swaps A/T and C/G.
//! Both operations are total: anything outside the alphabet behaves like `N`.

/// Mask with all four bases set; the mask of `N`.
pub const ANY_BASE: u8 = 0b1111;

/// A lookup table that maps ASCII nucleotide and ambiguity symbols
/// (upper and lower case) to their 4-bit base set. Unrecognized bytes map to 0.
const SYMBOL_TO_MASK: [u8; 256] = {
    let mut arr = [0u8; 256];
    let symbols: [(u8, u8); 16] = [
        (b'A', 0b0001), // A
        (b'C', 0b0010), // C
        (b'G', 0b0100), // G
        (b'T', 0b1000), // T
        (b'U', 0b1000), // U (RNA)
        (b'R', 0b0101), // A or G
        (b'Y', 0b1010), // C or T
        (b'S', 0b0110), // C or G
        (b'W', 0b1001), // A or T
        (b'K', 0b1100), // G or T
        (b'M', 0b0011), // A or C
        (b'B', 0b1110), // C or G or T
        (b'D', 0b1101), // A or G or T
        (b'H', 0b1011), // A or C or T
        (b'V', 0b0111), // A or C or G
        (b'N', 0b1111), // any base
    ];
    let mut i = 0;
    while i < symbols.len() {
        let (symbol, mask) = symbols[i];
        arr[symbol as usize] = mask;
        arr[symbol.to_ascii_lowercase() as usize] = mask;
        i += 1;
    }
    arr
};

/// Reverse lookup: 4-bit base set → canonical upper case symbol.
/// The empty set has no symbol and decodes to `N`.
const MASK_TO_SYMBOL: [u8; 16] = [
    b'N', // 0000
    b'A', // 0001
    b'C', // 0010
    b'M', // 0011
    b'G', // 0100
    b'R', // 0101
    b'S', // 0110
    b'V', // 0111
    b'T', // 1000
    b'W', // 1001
    b'Y', // 1010
    b'H', // 1011
    b'K', // 1100
    b'D', // 1101
    b'B', // 1110
    b'N', // 1111
];

/// Base set of a symbol; unrecognized symbols give the full set.
#[inline]
pub fn mask(symbol: u8) -> u8 {
    match SYMBOL_TO_MASK[symbol as usize] {
        0 => ANY_BASE,
        mask => mask,
    }
}

/// Canonical symbol for a base set. Only the low four bits are read.
#[inline]
pub fn symbol(mask: u8) -> u8 {
    MASK_TO_SYMBOL[(mask & ANY_BASE) as usize]
}

/// Ambiguity code covering every base of `x` and `y`.
#[inline]
pub fn combine(x: u8, y: u8) -> u8 {
    symbol(mask(x) | mask(y))
}

/// Complement of a symbol: A↔T, C↔G, ambiguity codes map to the code of the
/// complemented set. `S`, `W` and `N` are their own complement.
#[inline]
pub fn complement(x: u8) -> u8 {
    let m = mask(x);
    // A(bit 0) <-> T(bit 3), C(bit 1) <-> G(bit 2)
    let swapped = ((m & 0b0001) << 3) | ((m & 0b1000) >> 3) | ((m & 0b0010) << 1) | ((m & 0b0100) >> 1);
    symbol(swapped)
}
