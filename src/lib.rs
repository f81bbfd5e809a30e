pub mod alignment;
pub mod audio;
pub mod config;
pub mod error;
pub mod masking;
pub mod phonemes;
pub mod pipeline;
pub mod types;

pub use alignment::{span_to_interval, AlignmentTable};
pub use config::{DecodeConfig, EditConfig, ModelArgs};
pub use error::EditError;
pub use masking::{MaskConverter, MaskMargins};
pub use phonemes::{PhonemeVocab, UnknownPhonemePolicy};
pub use pipeline::builder::SpeechEditorBuilder;
pub use pipeline::reconstruction::{splice_preserved, trim_tts_lead, ReconstructionMode};
pub use pipeline::runtime::SpeechEditor;
pub use pipeline::traits::{
    AudioCodec, AudioEncoding, GenerationOutput, GenerationRequest, GuidanceConfig,
    MaskedGenerator, Phonemizer, SamplingConfig,
};
pub use types::{
    EditRequest, FrameSpan, MaskInterval, RowKind, TimeInterval, TokenStream, Waveform,
    WordAlignmentRow, WordSpan,
};
