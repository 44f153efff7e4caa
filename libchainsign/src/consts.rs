//! Constants shared by the signer back-ends and the device chain.

/// The tag reported by, and accepted for, the RSA back-end.
pub const RSA_TAG: &str = "RSA";

/// The tag reported by, and accepted for, the ECDSA back-end.
pub const ECC_TAG: &str = "ECC";

/// The modulus size, in bits, of freshly generated RSA keys.
pub const RSA_KEY_BITS: usize = 2048;

/// The width, in bytes, of one P-256 scalar.
///
/// An encoded ECDSA signature is two of these: `r || s`.
pub const ECC_SCALAR_LEN: usize = 32;

/// The byte joining the fields of the canonical data to be signed.
pub const SEPARATOR: u8 = b'_';

/// The length of the raw bytes of a device identity.
pub const DEVICE_ID_LEN: usize = 16;
