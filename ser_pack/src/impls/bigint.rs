use num_bigint::{BigInt, BigUint, Sign};

use crate::{BufferReader, BufferWriter, Error, Packable, Result};

// `BigUint` is encoded as a byte string of its little-endian magnitude.
// Zero is the empty string.
impl Packable for BigUint {
	const MIN_SIZE: usize = 4;

	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		if self.bits() == 0 {
			return writer.write_var_length(0);
		}
		let bytes = self.to_bytes_le();
		writer.write_var_length(bytes.len())?;
		writer.write_raw(&bytes)
	}

	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		let len = reader.read_length(1)?;
		let bytes = reader.read_span(len)?;
		Ok(BigUint::from_bytes_le(bytes))
	}
}

const SIGN_MINUS: u8 = 0;
const SIGN_ZERO: u8 = 1;
const SIGN_PLUS: u8 = 2;

// `BigInt` is a sign byte followed by the magnitude as `BigUint`
impl Packable for BigInt {
	const MIN_SIZE: usize = 1 + BigUint::MIN_SIZE;

	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		let sign = match self.sign() {
			Sign::Minus => SIGN_MINUS,
			Sign::NoSign => SIGN_ZERO,
			Sign::Plus => SIGN_PLUS,
		};
		writer.write_raw(&[sign])?;
		self.magnitude().pack(writer)
	}

	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		let sign = match reader.read_byte()? {
			SIGN_MINUS => Sign::Minus,
			SIGN_ZERO => Sign::NoSign,
			SIGN_PLUS => Sign::Plus,
			byte => return Err(Error::InvalidSign(byte)),
		};
		let magnitude = BigUint::unpack(reader)?;
		Ok(BigInt::from_biguint(sign, magnitude))
	}
}
