//! Resource and operation catalogue.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use vlmrun_client::types::Domain;

/// Group of operations a node can be configured with.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Resource {
    #[default]
    DocumentAi,
    AudioAi,
    ImageAi,
    AgentAi,
    File,
    Experimental,
    Http,
    Generation,
}

impl Resource {
    /// Operations belonging to this resource.
    pub fn operations(self) -> impl Iterator<Item = Operation> {
        Operation::iter().filter(move |op| op.resource() == self)
    }

    /// Operation used when none is configured.
    pub fn default_operation(self) -> Operation {
        match self {
            Resource::DocumentAi => Operation::ResumeParser,
            Resource::AudioAi => Operation::AudioTranscription,
            Resource::ImageAi => Operation::ImageCaptioning,
            Resource::AgentAi => Operation::GithubAgent,
            Resource::File => Operation::FileList,
            Resource::Experimental => Operation::DocumentEmbedding,
            Resource::Http => Operation::Get,
            Resource::Generation => Operation::DocumentGeneration,
        }
    }
}

/// A single node operation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Operation {
    ResumeParser,
    InvoiceParser,
    PresentationParser,
    FormFilling,
    AudioTranscription,
    ImageCataloging,
    ImageCaptioning,
    GithubAgent,
    LinkedinAgent,
    MarketResearchAgent,
    FileList,
    FileUpload,
    DocumentEmbedding,
    ImageEmbedding,
    #[serde(rename = "GET")]
    #[strum(serialize = "GET")]
    Get,
    #[serde(rename = "POST")]
    #[strum(serialize = "POST")]
    Post,
    DocumentGeneration,
    ImageGeneration,
}

impl Operation {
    /// Resource this operation belongs to.
    pub fn resource(self) -> Resource {
        match self {
            Operation::ResumeParser
            | Operation::InvoiceParser
            | Operation::PresentationParser
            | Operation::FormFilling => Resource::DocumentAi,
            Operation::AudioTranscription => Resource::AudioAi,
            Operation::ImageCataloging | Operation::ImageCaptioning => Resource::ImageAi,
            Operation::GithubAgent | Operation::LinkedinAgent | Operation::MarketResearchAgent => {
                Resource::AgentAi
            }
            Operation::FileList | Operation::FileUpload => Resource::File,
            Operation::DocumentEmbedding | Operation::ImageEmbedding => Resource::Experimental,
            Operation::Get | Operation::Post => Resource::Http,
            Operation::DocumentGeneration | Operation::ImageGeneration => Resource::Generation,
        }
    }

    /// Domain sent with the prediction request, if any.
    pub fn domain(self) -> Option<Domain> {
        match self {
            Operation::ResumeParser => Some(Domain::DocumentResume),
            Operation::InvoiceParser => Some(Domain::DocumentInvoice),
            Operation::PresentationParser => Some(Domain::DocumentPresentation),
            Operation::FormFilling => Some(Domain::DocumentPdfAutofill),
            Operation::ImageCaptioning => Some(Domain::DocumentGenerative),
            Operation::GithubAgent => Some(Domain::WebGithubDeveloperStats),
            Operation::MarketResearchAgent => Some(Domain::WebMarketResearch),
            Operation::AudioTranscription => Some(Domain::AudioTranscription),
            Operation::ImageCataloging
            | Operation::LinkedinAgent
            | Operation::FileList
            | Operation::FileUpload
            | Operation::DocumentEmbedding
            | Operation::ImageEmbedding
            | Operation::Get
            | Operation::Post
            | Operation::DocumentGeneration
            | Operation::ImageGeneration => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_mapping() {
        assert_eq!(Operation::ResumeParser.domain(), Some(Domain::DocumentResume));
        assert_eq!(
            Operation::FormFilling.domain().map(|d| d.as_str()),
            Some("document.pdf-autofill")
        );
        assert_eq!(
            Operation::ImageCaptioning.domain(),
            Some(Domain::DocumentGenerative)
        );
        assert_eq!(Operation::LinkedinAgent.domain(), None);
        assert_eq!(Operation::ImageEmbedding.domain(), None);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(Operation::MarketResearchAgent.to_string(), "marketResearchAgent");
        assert_eq!(
            "imageGeneration".parse::<Operation>().unwrap().resource(),
            Resource::Generation
        );
        assert_eq!("GET".parse::<Operation>().unwrap(), Operation::Get);
        assert_eq!(
            serde_json::to_value(Resource::DocumentAi).unwrap(),
            serde_json::json!("documentAi")
        );
        assert_eq!(
            serde_json::from_value::<Operation>(serde_json::json!("POST")).unwrap(),
            Operation::Post
        );
    }

    #[test]
    fn test_every_operation_has_a_resource() {
        let total: usize = Resource::iter().map(|r| r.operations().count()).sum();
        assert_eq!(total, Operation::iter().count());
        for resource in Resource::iter() {
            assert_eq!(resource.default_operation().resource(), resource);
        }
    }
}
