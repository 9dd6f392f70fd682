//! The legacy "powers of tau" wire format.
//!
//! Points carry a one byte marker, `0x00` for the point at infinity (written
//! alone) and `0x04` for an uncompressed affine point followed by its
//! coordinates. Base field elements are big-endian integers in standard
//! (non-Montgomery) form, and quadratic extension elements `c0 + c1 * u` are
//! packed into a single double-width integer `c1 * q + c0`.

use crate::{FormatError, Result};

use ark_bls12_377::Bls12_377;
use ark_bn254::Bn254;
use ark_ec::{
    pairing::Pairing,
    short_weierstrass::{Affine, SWCurveConfig},
};
use ark_ff::{Fp, Fp2, Fp2Config, FpConfig, PrimeField};
use num_bigint::BigUint;
use std::{
    fmt,
    io::{Read, Write},
    str::FromStr,
};

const MARKER_ZERO: u8 = 0x00;
const MARKER_UNCOMPRESSED: u8 = 0x04;

/// The curves a ceremony can run on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CurveKind {
    Bn254,
    Bls12_377,
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CurveKind::Bn254 => write!(f, "bn254"),
            CurveKind::Bls12_377 => write!(f, "bls12_377"),
        }
    }
}

pub fn curve_from_str(src: &str) -> std::result::Result<CurveKind, String> {
    let curve = match src.to_lowercase().as_str() {
        "bn254" | "alt_bn128" => CurveKind::Bn254,
        "bls12_377" => CurveKind::Bls12_377,
        _ => return Err("unsupported curve. Currently supported: bn254, bls12_377".to_string()),
    };
    Ok(curve)
}

impl FromStr for CurveKind {
    type Err = String;

    fn from_str(src: &str) -> std::result::Result<Self, Self::Err> {
        curve_from_str(src)
    }
}

/// Reads and writes the points of one curve in the legacy format.
pub trait PointCodec<E: Pairing>: Send + Sync {
    fn curve(&self) -> CurveKind;

    fn read_g1(&self, reader: &mut dyn Read) -> Result<E::G1Affine>;

    fn read_g2(&self, reader: &mut dyn Read) -> Result<E::G2Affine>;

    fn write_g1(&self, writer: &mut dyn Write, point: &E::G1Affine) -> Result<()>;

    fn write_g2(&self, writer: &mut dyn Write, point: &E::G2Affine) -> Result<()>;

    fn read_fr(&self, reader: &mut dyn Read) -> Result<E::ScalarField>;

    fn write_fr(&self, writer: &mut dyn Write, scalar: &E::ScalarField) -> Result<()>;
}

#[derive(Debug, Default, Copy, Clone)]
pub struct Bn254Codec;

impl PointCodec<Bn254> for Bn254Codec {
    fn curve(&self) -> CurveKind {
        CurveKind::Bn254
    }

    fn read_g1(&self, reader: &mut dyn Read) -> Result<ark_bn254::G1Affine> {
        read_point(reader)
    }

    fn read_g2(&self, reader: &mut dyn Read) -> Result<ark_bn254::G2Affine> {
        read_point(reader)
    }

    fn write_g1(&self, writer: &mut dyn Write, point: &ark_bn254::G1Affine) -> Result<()> {
        write_point(writer, point)
    }

    fn write_g2(&self, writer: &mut dyn Write, point: &ark_bn254::G2Affine) -> Result<()> {
        write_point(writer, point)
    }

    fn read_fr(&self, reader: &mut dyn Read) -> Result<ark_bn254::Fr> {
        read_prime_field(reader)
    }

    fn write_fr(&self, writer: &mut dyn Write, scalar: &ark_bn254::Fr) -> Result<()> {
        write_prime_field(writer, scalar)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct Bls12_377Codec;

impl PointCodec<Bls12_377> for Bls12_377Codec {
    fn curve(&self) -> CurveKind {
        CurveKind::Bls12_377
    }

    fn read_g1(&self, reader: &mut dyn Read) -> Result<ark_bls12_377::G1Affine> {
        read_point(reader)
    }

    fn read_g2(&self, reader: &mut dyn Read) -> Result<ark_bls12_377::G2Affine> {
        read_point(reader)
    }

    fn write_g1(&self, writer: &mut dyn Write, point: &ark_bls12_377::G1Affine) -> Result<()> {
        write_point(writer, point)
    }

    fn write_g2(&self, writer: &mut dyn Write, point: &ark_bls12_377::G2Affine) -> Result<()> {
        write_point(writer, point)
    }

    fn read_fr(&self, reader: &mut dyn Read) -> Result<ark_bls12_377::Fr> {
        read_prime_field(reader)
    }

    fn write_fr(&self, writer: &mut dyn Write, scalar: &ark_bls12_377::Fr) -> Result<()> {
        write_prime_field(writer, scalar)
    }
}

/// Coordinate fields which have a legacy encoding.
pub trait LegacyField: Sized {
    /// Encoded size in bytes.
    fn legacy_size() -> usize;

    fn read_legacy(reader: &mut dyn Read) -> Result<Self>;

    fn write_legacy(&self, writer: &mut dyn Write) -> Result<()>;
}

impl<P: FpConfig<N>, const N: usize> LegacyField for Fp<P, N> {
    fn legacy_size() -> usize {
        prime_field_size::<Self>()
    }

    fn read_legacy(reader: &mut dyn Read) -> Result<Self> {
        read_prime_field(reader)
    }

    fn write_legacy(&self, writer: &mut dyn Write) -> Result<()> {
        write_prime_field(writer, self)
    }
}

impl<P: Fp2Config> LegacyField for Fp2<P> {
    fn legacy_size() -> usize {
        2 * prime_field_size::<P::Fp>()
    }

    fn read_legacy(reader: &mut dyn Read) -> Result<Self> {
        let modulus: BigUint = P::Fp::MODULUS.into();
        let packed = read_big_endian(reader, Self::legacy_size())?;
        let c1 = &packed / &modulus;
        let c0 = &packed % &modulus;
        if c1 >= modulus {
            return Err(FormatError::InvalidFieldElement.into());
        }
        Ok(Fp2::<P>::new(P::Fp::from(c0), P::Fp::from(c1)))
    }

    fn write_legacy(&self, writer: &mut dyn Write) -> Result<()> {
        let modulus: BigUint = P::Fp::MODULUS.into();
        let c0: BigUint = self.c0.into();
        let c1: BigUint = self.c1.into();
        write_big_endian(writer, &(c1 * modulus + c0), Self::legacy_size())
    }
}

fn prime_field_size<F: PrimeField>() -> usize {
    (F::MODULUS_BIT_SIZE as usize + 7) / 8
}

pub fn read_prime_field<F: PrimeField>(reader: &mut dyn Read) -> Result<F> {
    let value = read_big_endian(reader, prime_field_size::<F>())?;
    let modulus: BigUint = F::MODULUS.into();
    if value >= modulus {
        return Err(FormatError::InvalidFieldElement.into());
    }
    Ok(F::from(value))
}

pub fn write_prime_field<F: PrimeField>(writer: &mut dyn Write, element: &F) -> Result<()> {
    let value: BigUint = (*element).into();
    write_big_endian(writer, &value, prime_field_size::<F>())
}

fn read_big_endian(reader: &mut dyn Read, size: usize) -> Result<BigUint> {
    let mut bytes = vec![0u8; size];
    reader.read_exact(&mut bytes)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

fn write_big_endian(writer: &mut dyn Write, value: &BigUint, size: usize) -> Result<()> {
    let bytes = value.to_bytes_be();
    if bytes.len() > size {
        return Err(FormatError::InvalidFieldElement.into());
    }
    let mut padded = vec![0u8; size - bytes.len()];
    padded.extend_from_slice(&bytes);
    writer.write_all(&padded)?;
    Ok(())
}

pub fn read_point<P: SWCurveConfig>(reader: &mut dyn Read) -> Result<Affine<P>>
where
    P::BaseField: LegacyField,
{
    let mut marker = [0u8; 1];
    reader.read_exact(&mut marker)?;
    match marker[0] {
        MARKER_ZERO => Ok(Affine::identity()),
        MARKER_UNCOMPRESSED => {
            let x = P::BaseField::read_legacy(reader)?;
            let y = P::BaseField::read_legacy(reader)?;
            let point = Affine::new_unchecked(x, y);
            if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
                return Err(FormatError::InvalidPoint.into());
            }
            Ok(point)
        }
        marker => Err(FormatError::InvalidMarker(marker).into()),
    }
}

pub fn write_point<P: SWCurveConfig>(writer: &mut dyn Write, point: &Affine<P>) -> Result<()>
where
    P::BaseField: LegacyField,
{
    if point.infinity {
        writer.write_all(&[MARKER_ZERO])?;
        return Ok(());
    }
    writer.write_all(&[MARKER_UNCOMPRESSED])?;
    point.x.write_legacy(writer)?;
    point.y.write_legacy(writer)
}

/// Size of an uncompressed legacy point.
pub fn legacy_point_size<P: SWCurveConfig>() -> usize
where
    P::BaseField: LegacyField,
{
    1 + 2 * P::BaseField::legacy_size()
}
