//! Binary persistence of a built index.
//!
//! The layout is versioned and fully big-endian: a magic header, the build
//! parameters, the records (keys, sizes, signatures), and per partition its
//! size range, banding parameters, and band maps with slot lists in insertion
//! order. Band maps are written with sorted band keys, so serialisation is
//! deterministic and a reloaded index answers queries byte-for-byte
//! identically to the original.
use std::io::{Read, Write};

use hashbrown::HashMap;

use minsketch::HashWord;

use crate::ensemble::{LshEnsemble, PartitionIndex};
use crate::errors::{EnsembleError, Result};
use crate::partition::{Partition, PartitionMode};
use crate::record::DomainRecord;
use crate::table::LshTable;

const MAGIC: [u8; 4] = *b"LSHE";
const FORMAT_VERSION: u32 = 1;

/// Trait of keys that serialize to and from bytes for index persistence.
pub trait KeyBytes: Sized {
    /// Serializes the key.
    fn to_bytes(&self) -> Vec<u8>;
    /// Parses a key back from its bytes.
    fn from_bytes(bytes: Vec<u8>) -> Result<Self>;
}

impl KeyBytes for Vec<u8> {
    fn to_bytes(&self) -> Vec<u8> {
        self.clone()
    }

    fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(bytes)
    }
}

impl KeyBytes for String {
    fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        String::from_utf8(bytes)
            .map_err(|e| EnsembleError::decode(format!("key is not valid UTF-8: {e}")))
    }
}

impl KeyBytes for u64 {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }

    fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let arr: [u8; 8] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| EnsembleError::decode("u64 key must be 8 bytes".to_string()))?;
        Ok(Self::from_be_bytes(arr))
    }
}

impl<W: HashWord, K: KeyBytes> LshEnsemble<W, K> {
    /// Serializes the index.
    pub fn write_to<Wr: Write>(&self, wtr: &mut Wr) -> std::io::Result<()> {
        wtr.write_all(&MAGIC)?;
        wtr.write_all(&FORMAT_VERSION.to_be_bytes())?;
        wtr.write_all(&[W::BYTES as u8])?;
        write_u64(wtr, self.num_hashes as u64)?;
        write_u64(wtr, self.max_rows as u64)?;
        write_u64(wtr, self.target_threshold.to_bits())?;
        wtr.write_all(&[mode_to_byte(self.mode)])?;

        write_u64(wtr, self.records.len() as u64)?;
        let mut buf = vec![];
        for r in &self.records {
            let key = r.key.to_bytes();
            write_u64(wtr, key.len() as u64)?;
            wtr.write_all(&key)?;
            write_u64(wtr, r.size as u64)?;
            buf.clear();
            for &w in &r.signature {
                w.write_be(&mut buf);
            }
            wtr.write_all(&buf)?;
        }

        write_u64(wtr, self.parts.len() as u64)?;
        for part in &self.parts {
            write_u64(wtr, part.partition.lower as u64)?;
            write_u64(wtr, part.partition.upper as u64)?;
            let params = part.table.params();
            write_u64(wtr, params.bands as u64)?;
            write_u64(wtr, params.rows as u64)?;
            for map in part.table.band_maps() {
                write_u64(wtr, map.len() as u64)?;
                let mut band_keys: Vec<u64> = map.keys().copied().collect();
                band_keys.sort_unstable();
                for band_key in band_keys {
                    write_u64(wtr, band_key)?;
                    let slots = &map[&band_key];
                    write_u64(wtr, slots.len() as u64)?;
                    for &slot in slots {
                        wtr.write_all(&slot.to_be_bytes())?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Parses an index serialized by [`Self::write_to`].
    ///
    /// The word type must match the one the index was written with.
    pub fn read_from<R: Read>(rdr: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_exact(rdr, &mut magic)?;
        if magic != MAGIC {
            return Err(EnsembleError::decode("bad magic bytes".to_string()));
        }
        let version = read_u32(rdr)?;
        if version != FORMAT_VERSION {
            return Err(EnsembleError::decode(format!(
                "unsupported format version {version}"
            )));
        }
        let word_bytes = read_u8(rdr)? as usize;
        if word_bytes != W::BYTES {
            return Err(EnsembleError::decode(format!(
                "index was written with {word_bytes}-byte words, expected {}",
                W::BYTES
            )));
        }
        let num_hashes = read_u64(rdr)? as usize;
        let max_rows = read_u64(rdr)? as usize;
        let target_threshold = f64::from_bits(read_u64(rdr)?);
        let mode = mode_from_byte(read_u8(rdr)?)?;

        let num_records = read_u64(rdr)? as usize;
        let mut records = Vec::with_capacity(num_records);
        let mut word_buf = vec![0u8; W::BYTES];
        for _ in 0..num_records {
            let key_len = read_u64(rdr)? as usize;
            let mut key = vec![0u8; key_len];
            read_exact(rdr, &mut key)?;
            let key = K::from_bytes(key)?;
            let size = read_u64(rdr)? as usize;
            let mut signature = Vec::with_capacity(num_hashes);
            for _ in 0..num_hashes {
                read_exact(rdr, &mut word_buf)?;
                signature.push(W::read_be(&word_buf));
            }
            records.push(DomainRecord { key, size, signature });
        }

        let num_parts = read_u64(rdr)? as usize;
        let mut parts = Vec::with_capacity(num_parts);
        for _ in 0..num_parts {
            let lower = read_u64(rdr)? as usize;
            let upper = read_u64(rdr)? as usize;
            let bands = read_u64(rdr)? as usize;
            let rows = read_u64(rdr)? as usize;
            if bands < 1 || rows < 1 {
                return Err(EnsembleError::decode(format!(
                    "partition banding {bands}x{rows} is degenerate"
                )));
            }
            if bands * rows > num_hashes {
                return Err(EnsembleError::decode(format!(
                    "partition banding {bands}x{rows} exceeds {num_hashes} hashes"
                )));
            }
            let mut maps = Vec::with_capacity(bands);
            for _ in 0..bands {
                let num_buckets = read_u64(rdr)? as usize;
                let mut map = HashMap::with_capacity(num_buckets);
                for _ in 0..num_buckets {
                    let band_key = read_u64(rdr)?;
                    let num_slots = read_u64(rdr)? as usize;
                    let mut slots = Vec::with_capacity(num_slots);
                    for _ in 0..num_slots {
                        let slot = read_u32(rdr)?;
                        if slot as usize >= num_records {
                            return Err(EnsembleError::decode(format!(
                                "slot {slot} out of range for {num_records} records"
                            )));
                        }
                        slots.push(slot);
                    }
                    map.insert(band_key, slots);
                }
                maps.push(map);
            }
            parts.push(PartitionIndex {
                partition: Partition { lower, upper },
                table: LshTable::from_band_maps(maps, rows),
            });
        }

        Ok(Self {
            num_hashes,
            max_rows,
            target_threshold,
            mode,
            records,
            parts,
        })
    }
}

const fn mode_to_byte(mode: PartitionMode) -> u8 {
    match mode {
        PartitionMode::EquiDepth => 0,
        PartitionMode::CostOptimal => 1,
    }
}

fn mode_from_byte(byte: u8) -> Result<PartitionMode> {
    match byte {
        0 => Ok(PartitionMode::EquiDepth),
        1 => Ok(PartitionMode::CostOptimal),
        b => Err(EnsembleError::decode(format!("unknown partition mode {b}"))),
    }
}

fn write_u64<Wr: Write>(wtr: &mut Wr, v: u64) -> std::io::Result<()> {
    wtr.write_all(&v.to_be_bytes())
}

fn read_exact<R: Read>(rdr: &mut R, buf: &mut [u8]) -> Result<()> {
    rdr.read_exact(buf)
        .map_err(|e| EnsembleError::decode(format!("truncated index: {e}")))
}

fn read_u8<R: Read>(rdr: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    read_exact(rdr, &mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(rdr: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_exact(rdr, &mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_u64<R: Read>(rdr: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    read_exact(rdr, &mut buf)?;
    Ok(u64::from_be_bytes(buf))
}
