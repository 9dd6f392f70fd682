use crate::{Error, FormatError, Result};

use ark_ec::AffineRepr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};
use rayon::prelude::*;
use std::{
    convert::TryFrom,
    fmt,
    io::{Read, Write},
};

/// Determines if point compression should be used.
#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum UseCompression {
    Yes,
    No,
}

impl fmt::Display for UseCompression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            UseCompression::Yes => write!(f, "Yes"),
            UseCompression::No => write!(f, "No"),
        }
    }
}

impl From<UseCompression> for Compress {
    fn from(compressed: UseCompression) -> Self {
        match compressed {
            UseCompression::Yes => Compress::Yes,
            UseCompression::No => Compress::No,
        }
    }
}

/// Determines if incoming points should be checked to be on the curve
/// and in the prime order subgroup.
#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CheckForCorrectness {
    Full,
    No,
}

impl fmt::Display for CheckForCorrectness {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CheckForCorrectness::Full => write!(f, "Full"),
            CheckForCorrectness::No => write!(f, "No"),
        }
    }
}

impl From<CheckForCorrectness> for Validate {
    fn from(check: CheckForCorrectness) -> Self {
        match check {
            CheckForCorrectness::Full => Validate::Yes,
            CheckForCorrectness::No => Validate::No,
        }
    }
}

/// The group elements carried by ceremony files, used to label errors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ElementType {
    TauG1,
    TauG2,
    AlphaG1,
    BetaG1,
    BetaG2,
    DeltaG1,
    DeltaG2,
    H,
    L,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ElementType::TauG1 => write!(f, "TauG1"),
            ElementType::TauG2 => write!(f, "TauG2"),
            ElementType::AlphaG1 => write!(f, "AlphaG1"),
            ElementType::BetaG1 => write!(f, "BetaG1"),
            ElementType::BetaG2 => write!(f, "BetaG2"),
            ElementType::DeltaG1 => write!(f, "DeltaG1"),
            ElementType::DeltaG2 => write!(f, "DeltaG2"),
            ElementType::H => write!(f, "H"),
            ElementType::L => write!(f, "L"),
        }
    }
}

/// Returns the size in bytes of a single serialized point.
pub fn element_size<G: AffineRepr>(compressed: UseCompression) -> usize {
    G::zero().serialized_size(compressed.into())
}

pub fn read_element<G: AffineRepr, R: Read>(
    reader: R,
    compressed: UseCompression,
    check_for_correctness: CheckForCorrectness,
) -> Result<G> {
    Ok(G::deserialize_with_mode(
        reader,
        compressed.into(),
        check_for_correctness.into(),
    )?)
}

pub fn write_element<G: AffineRepr, W: Write>(writer: W, element: &G, compressed: UseCompression) -> Result<()> {
    Ok(element.serialize_with_mode(writer, compressed.into())?)
}

/// Reads `length` consecutive points. The bytes are read up front and the points
/// are decoded (and checked) in parallel.
pub fn read_elements<G: AffineRepr, R: Read>(
    mut reader: R,
    length: usize,
    compressed: UseCompression,
    check_for_correctness: CheckForCorrectness,
) -> Result<Vec<G>> {
    let size = element_size::<G>(compressed);
    let total = length
        .checked_mul(size)
        .ok_or(FormatError::InvalidLength { expected: usize::MAX, got: length })?;
    let mut bytes = vec![0u8; total];
    reader.read_exact(&mut bytes)?;
    bytes
        .par_chunks(size)
        .map(|chunk| read_element(chunk, compressed, check_for_correctness))
        .collect::<Result<Vec<_>>>()
}

pub fn write_elements<G: AffineRepr, W: Write>(mut writer: W, elements: &[G], compressed: UseCompression) -> Result<()> {
    for element in elements {
        write_element(&mut writer, element, compressed)?;
    }
    Ok(())
}

/// Serializes any arkworks object, honouring the compression setting.
pub fn write_compressed<T: CanonicalSerialize, W: Write>(writer: W, value: &T, compressed: UseCompression) -> Result<()> {
    Ok(value.serialize_with_mode(writer, compressed.into())?)
}

pub fn read_compressed<T: CanonicalDeserialize, R: Read>(
    reader: R,
    compressed: UseCompression,
    check_for_correctness: CheckForCorrectness,
) -> Result<T> {
    Ok(T::deserialize_with_mode(
        reader,
        compressed.into(),
        check_for_correctness.into(),
    )?)
}

/// Reads a little-endian u64 length header.
pub fn read_length<R: Read>(mut reader: R) -> Result<usize> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes)?;
    let length = u64::from_le_bytes(bytes);
    usize::try_from(length).map_err(|_| {
        Error::Format(FormatError::InvalidLength {
            expected: usize::MAX,
            got: usize::MAX,
        })
    })
}

pub fn write_length<W: Write>(mut writer: W, length: usize) -> Result<()> {
    writer.write_all(&(length as u64).to_le_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{G1Affine, G1Projective};
    use ark_ec::CurveGroup;
    use ark_std::UniformRand;
    use rand::thread_rng;

    #[test]
    fn elements_survive_a_write_read_cycle() {
        let rng = &mut thread_rng();
        let points = (0..10)
            .map(|_| G1Projective::rand(rng).into_affine())
            .collect::<Vec<_>>();
        for compressed in &[UseCompression::Yes, UseCompression::No] {
            let mut buf = vec![];
            write_elements(&mut buf, &points, *compressed).unwrap();
            assert_eq!(buf.len(), points.len() * element_size::<G1Affine>(*compressed));
            let read: Vec<G1Affine> =
                read_elements(&buf[..], points.len(), *compressed, CheckForCorrectness::Full).unwrap();
            assert_eq!(read, points);
        }
    }

    #[test]
    fn lengths_are_little_endian() {
        let mut buf = vec![];
        write_length(&mut buf, 0x0102).unwrap();
        assert_eq!(buf, vec![0x02, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(read_length(&buf[..]).unwrap(), 0x0102);
    }

    #[test]
    fn vectors_of_points_use_compressed_helpers() {
        let rng = &mut thread_rng();
        let points = (0..4)
            .map(|_| G1Projective::rand(rng).into_affine())
            .collect::<Vec<_>>();
        let mut buf = vec![];
        write_compressed(&mut buf, &points, UseCompression::Yes).unwrap();
        let read: Vec<G1Affine> = read_compressed(&buf[..], UseCompression::Yes, CheckForCorrectness::Full).unwrap();
        assert_eq!(read, points);
    }

    #[test]
    fn truncated_vectors_are_rejected() {
        let rng = &mut thread_rng();
        let points = (0..3)
            .map(|_| G1Projective::rand(rng).into_affine())
            .collect::<Vec<_>>();
        let mut buf = vec![];
        write_elements(&mut buf, &points, UseCompression::Yes).unwrap();
        buf.pop();
        let err = read_elements::<G1Affine, _>(&buf[..], 3, UseCompression::Yes, CheckForCorrectness::Full).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::UnexpectedEof)));
    }
}
