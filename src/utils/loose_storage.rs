use crate::error::{Error, Result};
use crate::utils::{Hash, ObjectStore, ObjectType, RawObject};
use flate2::{Compression, bufread::ZlibDecoder, write::ZlibEncoder};
use log::debug;
use std::{
    fs,
    io::{ErrorKind, Read, Write},
    path::{Path, PathBuf},
};

/// Reads and writes zlib-compressed loose objects under `<vit dir>/objects`,
/// addressed as `objects/<first two hex digits>/<remaining hex digits>`.
#[derive(Debug, Clone)]
pub struct LooseStorage {
    objects_dir: PathBuf,
}

impl LooseStorage {
    /// Open the object directory of an existing repository.
    pub fn open(vit_dir: &Path) -> Result<LooseStorage> {
        let objects_dir = vit_dir.join("objects");
        if !objects_dir.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("{} is not a vit directory", vit_dir.display()),
            )));
        }

        Ok(LooseStorage { objects_dir })
    }

    fn object_path(&self, hash: &Hash) -> PathBuf {
        let hash_hex = hash.to_hex();
        let (dir_name, file_name) = hash_hex.split_at(2);
        self.objects_dir.join(dir_name).join(file_name)
    }
}

/// Split a decompressed loose object into its type and body, checking the declared size.
fn parse_object(data: &[u8]) -> Result<(ObjectType, Vec<u8>)> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::CorruptObject("missing header terminator".to_string()))?;

    let header = std::str::from_utf8(&data[..nul])
        .map_err(|_| Error::CorruptObject("header is not UTF-8".to_string()))?;
    let (kind, size) = header
        .split_once(' ')
        .ok_or_else(|| Error::CorruptObject(format!("malformed header {:?}", header)))?;

    let kind: ObjectType = kind.parse()?;
    let size: usize = size
        .parse()
        .map_err(|_| Error::CorruptObject(format!("malformed size {:?}", size)))?;

    let body = &data[nul + 1..];
    if body.len() != size {
        return Err(Error::CorruptObject(format!(
            "declared size {} but body has {} bytes",
            size,
            body.len()
        )));
    }

    Ok((kind, body.to_vec()))
}

impl ObjectStore for LooseStorage {
    fn get(&self, kind: ObjectType, hash: &Hash) -> Result<RawObject> {
        let path = self.object_path(hash);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound(*hash));
            }
            Err(err) => return Err(err.into()),
        };

        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;

        let (found, body) = parse_object(&decompressed)?;
        if found != kind {
            debug!("{} is a {}, wanted {}", hash, found, kind);
            return Err(Error::ObjectNotFound(*hash));
        }

        let mut object = RawObject::new(kind);
        object.set_size(body.len() as u64);
        *object.writer() = body;
        object.set_hash(*hash);
        Ok(object)
    }

    fn put(&self, object: &RawObject) -> Result<Hash> {
        let hash = Hash::for_object(object.kind(), object.body());
        let path = self.object_path(&hash);

        if path.exists() {
            return Ok(hash);
        }

        // "<type> <size>\0" followed by the body
        let header = format!("{} {}\0", object.kind(), object.body().len());
        let mut full_data = header.into_bytes();
        full_data.extend_from_slice(object.body());

        // Compress
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&full_data)?;
        let compressed = encoder.finish()?;

        if let Some(object_dir) = path.parent() {
            fs::create_dir_all(object_dir)?;
        }
        fs::write(&path, compressed)?;
        debug!("wrote {} {} to {}", object.kind(), hash, path.display());

        Ok(hash)
    }
}
