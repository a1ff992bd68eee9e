// 交互与识别常量
//
// Thresholds are fixed; they are not exposed through settings.

/// A finished selection whose width or height is at or below this is discarded.
pub const MIN_SELECTION_SIZE: i32 = 5;

/// Inward margin applied to a finished selection so the selection border is not captured.
pub const SELECTION_BORDER_INSET: i32 = 1;

/// Vertical distance between the size label and the top edge of the selection.
pub const SIZE_LABEL_OFFSET: i32 = 15;

/// Vertical-center gap between consecutive text regions that starts a new paragraph.
pub const PARAGRAPH_GAP_THRESHOLD: f32 = 30.0;

// 翻译模型文件（相对于模型目录）
pub const TRANSLATOR_MODEL_FILE: &str = "translator.onnx";
pub const SOURCE_VOCAB_FILE: &str = "src_vocabulary.txt";
pub const TARGET_VOCAB_FILE: &str = "tgt_vocabulary.txt";

/// ONNX input/output tensor names of the translation model.
pub const MODEL_INPUT_NAME: &str = "src";
pub const MODEL_OUTPUT_NAME: &str = "tgt";

// 词表保留 id
pub const PAD_ID: i64 = 0;
pub const UNK_ID: i64 = 1;
pub const BOS_ID: i64 = 2;
pub const EOS_ID: i64 = 3;

/// Sub-word boundary marker emitted by sentencepiece-style vocabularies.
pub const SUBWORD_MARKER: char = '\u{2581}';

/// Prefix of the echo returned when every translation path failed.
pub const TRANSLATION_FAILED_TAG: &str = "[translation failed]";

/// Shown to the user when recognition found nothing.
pub const OCR_NO_TEXT_PLACEHOLDER: &str = "未识别到有效文字。";
