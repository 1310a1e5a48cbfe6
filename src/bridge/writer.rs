// In: src/bridge/writer.rs

use std::io::Write;
use std::sync::Arc;

use crate::bridge::format::{self, EncodedDataBlock, EncodedFile, VERSION};
use crate::category_pipeline::{collect_instances, encode_category, CategoryInstance};
use crate::config::CodecConfig;
use crate::error::CifError;
use crate::utils::normalize_header;

//==================================================================================
// I. Producer/Consumer Boundary
//==================================================================================

/// Where a finished writer pushes its output.
pub trait OutputStream {
    fn write_string(&mut self, data: &str) -> Result<(), CifError>;
    fn write_binary(&mut self, data: &[u8]) -> Result<(), CifError>;
}

impl<W: Write + ?Sized> OutputStream for W {
    fn write_string(&mut self, data: &str) -> Result<(), CifError> {
        self.write_all(data.as_bytes())?;
        Ok(())
    }

    fn write_binary(&mut self, data: &[u8]) -> Result<(), CifError> {
        self.write_all(data)?;
        Ok(())
    }
}

/// The contract shared by the binary and text writers.
///
/// A writer accepts data blocks and categories until `encode` is called,
/// after which it is finalized and can only be flushed.
pub trait CifWriter {
    fn start_data_block(&mut self, header: &str) -> Result<(), CifError>;

    /// Calls `provider` once per context and writes the resulting instances
    /// as one category. Contexts that yield nothing or zero rows are skipped,
    /// and nothing is written when no rows remain.
    fn write_category<'a, C, D: 'a, P>(&mut self, provider: P, contexts: &'a [C]) -> Result<(), CifError>
    where
        P: Fn(&'a C) -> Option<CategoryInstance<'a, D>>;

    fn encode(&mut self) -> Result<(), CifError>;

    fn flush<S: OutputStream + ?Sized>(&self, stream: &mut S) -> Result<(), CifError>;
}

//==================================================================================
// II. Binary Writer
//==================================================================================

/// Accumulates encoded categories and serializes them as one MessagePack file.
#[derive(Debug)]
pub struct Writer {
    config: Arc<CodecConfig>,
    data_blocks: Vec<EncodedDataBlock>,
    encoded: Option<Vec<u8>>,
}

impl Writer {
    pub fn new(config: Arc<CodecConfig>) -> Self {
        Self {
            config,
            data_blocks: Vec::new(),
            encoded: None,
        }
    }

    /// The serialized file, available once `encode` has run.
    pub fn encoded_bytes(&self) -> Option<&[u8]> {
        self.encoded.as_deref()
    }

    fn ensure_open(&self) -> Result<(), CifError> {
        if self.encoded.is_some() {
            return Err(CifError::InvalidState(
                "writer already finalized".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new(Arc::new(CodecConfig::default()))
    }
}

impl CifWriter for Writer {
    fn start_data_block(&mut self, header: &str) -> Result<(), CifError> {
        self.ensure_open()?;
        let header = normalize_header(header);
        log::info!("starting data block '{}'", header);
        self.data_blocks.push(EncodedDataBlock {
            header,
            categories: Vec::new(),
        });
        Ok(())
    }

    fn write_category<'a, C, D: 'a, P>(&mut self, provider: P, contexts: &'a [C]) -> Result<(), CifError>
    where
        P: Fn(&'a C) -> Option<CategoryInstance<'a, D>>,
    {
        self.ensure_open()?;
        if self.data_blocks.is_empty() {
            return Err(CifError::InvalidState("No data block created.".to_string()));
        }

        let instances = collect_instances(provider, contexts);
        let Some(category) = encode_category(&instances, &self.config)? else {
            return Ok(());
        };

        match self.data_blocks.last_mut() {
            Some(block) => {
                block.categories.push(category);
                Ok(())
            }
            None => Err(CifError::InternalError(
                "data block disappeared during write".to_string(),
            )),
        }
    }

    fn encode(&mut self) -> Result<(), CifError> {
        self.ensure_open()?;
        let file = EncodedFile {
            version: VERSION.to_string(),
            encoder: self.config.encoder.clone(),
            data_blocks: std::mem::take(&mut self.data_blocks),
        };
        let bytes = format::to_msgpack(&file)?;
        log::info!(
            "encoded {} data block(s) into {} bytes",
            file.data_blocks.len(),
            bytes.len()
        );
        self.encoded = Some(bytes);
        Ok(())
    }

    fn flush<S: OutputStream + ?Sized>(&self, stream: &mut S) -> Result<(), CifError> {
        match &self.encoded {
            Some(bytes) => stream.write_binary(bytes),
            None => Err(CifError::InvalidState(
                "encode() must be called before flush()".to_string(),
            )),
        }
    }
}
