//! Server-side schema identifiers.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Schema identifier selecting the prediction the API runs.
///
/// Serialized as the dotted identifier, e.g. `document.resume`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr
)]
pub enum Domain {
    #[strum(serialize = "document.generative")]
    DocumentGenerative,
    #[strum(serialize = "document.presentation")]
    DocumentPresentation,
    #[strum(serialize = "document.visual-grounding")]
    DocumentVisualGrounding,
    #[strum(serialize = "document.invoice")]
    DocumentInvoice,
    #[strum(serialize = "document.resume")]
    DocumentResume,
    #[strum(serialize = "document.health-insurance-card")]
    DocumentHealthInsuranceCard,
    #[strum(serialize = "document.drivers-license")]
    DocumentDriversLicense,
    #[strum(serialize = "document.receipt")]
    DocumentReceipt,
    #[strum(serialize = "document.schema-creation")]
    DocumentSchemaCreation,
    #[strum(serialize = "document.pdf")]
    DocumentPdf,
    #[strum(serialize = "document.file")]
    DocumentFile,
    #[strum(serialize = "document.pdf-autofill")]
    DocumentPdfAutofill,
    #[strum(serialize = "document.hardware-spec-sheet")]
    DocumentHardwareSpecSheet,
    #[strum(serialize = "document.multimodal-embeddings")]
    DocumentMultimodalEmbeddings,
    #[strum(serialize = "document.multimodal-rag")]
    DocumentMultimodalRag,
    #[strum(serialize = "audio.transcription")]
    AudioTranscription,
    #[strum(serialize = "image.embeddings")]
    ImageEmbeddings,
    #[strum(serialize = "image.caption")]
    ImageCaption,
    #[strum(serialize = "video.transcription")]
    VideoTranscription,
    #[strum(serialize = "video.embeddings")]
    VideoEmbeddings,
    #[strum(serialize = "video.generative-embeddings")]
    VideoGenerativeEmbeddings,
    #[strum(serialize = "video.tv-news")]
    VideoTvNews,
    #[strum(serialize = "video.tv-intelligence")]
    VideoTvIntelligence,
    #[strum(serialize = "sports.nfl")]
    SportsNfl,
    #[strum(serialize = "sports.nba")]
    SportsNba,
    #[strum(serialize = "sports.soccer")]
    SportsSoccer,
    #[strum(serialize = "web.ecommerce-product-catalog")]
    WebEcommerceProductCatalog,
    #[strum(serialize = "web.github-developer-stats")]
    WebGithubDeveloperStats,
    #[strum(serialize = "web.market-research")]
    WebMarketResearch,
    #[strum(serialize = "social.twitter-card")]
    SocialTwitterCard,
}

impl Domain {
    /// Returns the dotted identifier.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Returns the category prefix, e.g. `document` for `document.resume`.
    pub fn category(&self) -> &'static str {
        let id = self.as_str();
        id.split_once('.').map_or(id, |(category, _)| category)
    }
}

impl Serialize for Domain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Domain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        id.parse()
            .map_err(|_| de::Error::custom(format!("unknown domain '{id}'")))
    }
}
