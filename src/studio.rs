//! Workflow state for the three studio tabs.
//!
//! Each tab runs a small state machine:
//!
//! ```text
//! Idle --submit (inputs valid)--> Pending --completion--> Idle (result or error)
//! ```
//!
//! A submission is identified by a [`Ticket`]. Switching tabs resets the newly
//! active tab and invalidates every outstanding ticket, so a late completion
//! can never land on a different tab's state.

use crate::error::{Result, StudioError};
use crate::image::{EncodedImage, GeneratedImage, GenerationRequest, ImageGenerator, ImageService};
use std::path::Path;

/// Fallback message for failures that carry no text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Product description pre-filled in the mockup tab.
pub const DEFAULT_PRODUCT_DESCRIPTION: &str = "a white t-shirt";

/// The studio tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Workflow {
    /// Logo onto product.
    #[default]
    Mockup,
    /// Instruction-driven image edit.
    Editor,
    /// Text to image.
    Generator,
}

impl Workflow {
    /// Tab label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mockup => "Product Mockups",
            Self::Editor => "Image Editor",
            Self::Generator => "Image Generator",
        }
    }
}

/// How the mockup product is provided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSource {
    /// Describe with text.
    #[default]
    Text,
    /// Upload an image.
    Image,
}

/// Inputs of the mockup tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockupInputs {
    /// Uploaded logo; required for both sources.
    pub logo: Option<EncodedImage>,
    /// Whether the product is described or uploaded.
    pub source: ProductSource,
    /// Product description, used with [`ProductSource::Text`].
    pub product_description: String,
    /// Uploaded product image, used with [`ProductSource::Image`].
    pub subject: Option<EncodedImage>,
}

impl Default for MockupInputs {
    fn default() -> Self {
        Self {
            logo: None,
            source: ProductSource::Text,
            product_description: DEFAULT_PRODUCT_DESCRIPTION.to_string(),
            subject: None,
        }
    }
}

/// Inputs of the editor tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorInputs {
    /// Image to edit.
    pub image: Option<EncodedImage>,
    /// How to change it.
    pub instruction: String,
}

/// Inputs of the generator tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorInputs {
    /// Description of the image to generate.
    pub prompt: String,
}

/// Inputs of whichever tab is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowInputs {
    /// Mockup tab.
    Mockup(MockupInputs),
    /// Editor tab.
    Editor(EditorInputs),
    /// Generator tab.
    Generator(GeneratorInputs),
}

fn present(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(text)
}

impl WorkflowInputs {
    /// Empty inputs for a tab.
    pub fn empty(workflow: Workflow) -> Self {
        match workflow {
            Workflow::Mockup => Self::Mockup(MockupInputs::default()),
            Workflow::Editor => Self::Editor(EditorInputs::default()),
            Workflow::Generator => Self::Generator(GeneratorInputs::default()),
        }
    }

    /// The tab these inputs belong to.
    pub fn workflow(&self) -> Workflow {
        match self {
            Self::Mockup(_) => Workflow::Mockup,
            Self::Editor(_) => Workflow::Editor,
            Self::Generator(_) => Workflow::Generator,
        }
    }

    /// Validates the inputs and builds the request they describe.
    pub fn to_request(&self) -> Result<GenerationRequest> {
        match self {
            Self::Mockup(inputs) => {
                let logo = inputs
                    .logo
                    .clone()
                    .ok_or_else(|| StudioError::missing("logo", "Please upload a logo."))?;
                match inputs.source {
                    ProductSource::Text => {
                        let description = present(&inputs.product_description).ok_or_else(|| {
                            StudioError::missing(
                                "product description",
                                "Please describe the product.",
                            )
                        })?;
                        Ok(GenerationRequest::mockup_from_text(logo, description))
                    }
                    ProductSource::Image => {
                        let subject = inputs.subject.clone().ok_or_else(|| {
                            StudioError::missing("product image", "Please upload a product image.")
                        })?;
                        Ok(GenerationRequest::mockup_from_image(logo, subject))
                    }
                }
            }
            Self::Editor(inputs) => {
                let image = inputs
                    .image
                    .clone()
                    .ok_or_else(|| StudioError::missing("image", "Please upload an image."))?;
                let instruction = present(&inputs.instruction).ok_or_else(|| {
                    StudioError::missing("instruction", "Please enter an edit prompt.")
                })?;
                Ok(GenerationRequest::edit(image, instruction))
            }
            Self::Generator(inputs) => {
                let prompt = present(&inputs.prompt)
                    .ok_or_else(|| StudioError::missing("prompt", "Please enter a prompt."))?;
                Ok(GenerationRequest::generate(prompt))
            }
        }
    }
}

/// Where an uploaded image goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    /// Mockup logo.
    Logo,
    /// Mockup product image.
    Subject,
    /// Image to edit.
    EditorImage,
}

impl ImageSlot {
    fn workflow(&self) -> Workflow {
        match self {
            Self::Logo | Self::Subject => Workflow::Mockup,
            Self::EditorImage => Workflow::Editor,
        }
    }

    fn field(&self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::Subject => "product image",
            Self::EditorImage => "image",
        }
    }
}

/// Phase of a tab's state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Ready for input or submission.
    #[default]
    Idle,
    /// One call outstanding; submission is blocked.
    Pending,
}

/// State of the active tab.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    inputs: WorkflowInputs,
    phase: Phase,
    last_error: Option<String>,
    last_result: Option<GeneratedImage>,
}

impl WorkflowState {
    fn new(workflow: Workflow) -> Self {
        Self {
            inputs: WorkflowInputs::empty(workflow),
            phase: Phase::Idle,
            last_error: None,
            last_result: None,
        }
    }

    /// Current tab inputs.
    pub fn inputs(&self) -> &WorkflowInputs {
        &self.inputs
    }

    /// Idle or waiting on a request.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    /// Message of the last failure, cleared on the next submit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Image from the last successful submit.
    pub fn last_result(&self) -> Option<&GeneratedImage> {
        self.last_result.as_ref()
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_pending() && self.inputs.to_request().is_ok()
    }
}

/// Identifies one submission; only the latest ticket can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    workflow: Workflow,
    epoch: u64,
}

impl Ticket {
    /// Tab the submission was made from.
    pub fn workflow(&self) -> Workflow {
        self.workflow
    }
}

/// A validated submission waiting for its service call.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Pass back to [`StudioState::complete`] with the outcome.
    pub ticket: Ticket,
    /// Request to send.
    pub request: GenerationRequest,
}

/// Active tab plus its state.
#[derive(Debug, Clone)]
pub struct StudioState {
    active: Workflow,
    state: WorkflowState,
    epoch: u64,
}

impl Default for StudioState {
    fn default() -> Self {
        Self::new(Workflow::default())
    }
}

impl StudioState {
    /// Starts on the given tab.
    pub fn new(active: Workflow) -> Self {
        Self {
            active,
            state: WorkflowState::new(active),
            epoch: 0,
        }
    }

    /// Tab currently shown.
    pub fn active(&self) -> Workflow {
        self.active
    }

    /// State of the active tab.
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Switches tabs, resetting the new tab to empty.
    ///
    /// Any in-flight submission becomes stale.
    pub fn switch_to(&mut self, workflow: Workflow) {
        if self.state.is_pending() {
            tracing::debug!(
                from = ?self.active,
                to = ?workflow,
                "switching tabs with a request in flight"
            );
        }
        self.active = workflow;
        self.state = WorkflowState::new(workflow);
        self.epoch += 1;
    }

    /// Mockup inputs, when the mockup tab is active.
    pub fn mockup_mut(&mut self) -> Option<&mut MockupInputs> {
        match &mut self.state.inputs {
            WorkflowInputs::Mockup(inputs) => Some(inputs),
            _ => None,
        }
    }

    /// Editor inputs, when the editor tab is active.
    pub fn editor_mut(&mut self) -> Option<&mut EditorInputs> {
        match &mut self.state.inputs {
            WorkflowInputs::Editor(inputs) => Some(inputs),
            _ => None,
        }
    }

    /// Generator inputs, when the generator tab is active.
    pub fn generator_mut(&mut self) -> Option<&mut GeneratorInputs> {
        match &mut self.state.inputs {
            WorkflowInputs::Generator(inputs) => Some(inputs),
            _ => None,
        }
    }

    /// Places an encoded image into a slot of the active tab.
    ///
    /// The previous image in that slot is discarded.
    pub fn set_image(&mut self, slot: ImageSlot, image: EncodedImage) -> Result<()> {
        match (&mut self.state.inputs, slot) {
            (WorkflowInputs::Mockup(inputs), ImageSlot::Logo) => inputs.logo = Some(image),
            (WorkflowInputs::Mockup(inputs), ImageSlot::Subject) => inputs.subject = Some(image),
            (WorkflowInputs::Editor(inputs), ImageSlot::EditorImage) => inputs.image = Some(image),
            _ => {
                return Err(StudioError::missing(
                    slot.field(),
                    format!(
                        "The {} belongs to the {} tab.",
                        slot.field(),
                        slot.workflow().label()
                    ),
                ))
            }
        }
        Ok(())
    }

    /// Encodes a file and places it into a slot.
    ///
    /// A decode failure leaves the state untouched.
    pub fn upload(&mut self, slot: ImageSlot, path: impl AsRef<Path>) -> Result<()> {
        let image = EncodedImage::from_path(path)?;
        self.set_image(slot, image)
    }

    /// Validates the active tab and moves it to Pending.
    ///
    /// On a validation failure the error slot is set and no call must be made.
    pub fn begin_submit(&mut self) -> Result<Submission> {
        if self.state.is_pending() {
            tracing::warn!(workflow = ?self.active, "submission rejected: request in flight");
            return Err(StudioError::missing(
                "request",
                "A request is already in progress.",
            ));
        }

        let request = match self.state.inputs.to_request() {
            Ok(request) => request,
            Err(err) => {
                self.state.last_error = Some(err.user_message());
                return Err(err);
            }
        };

        self.state.phase = Phase::Pending;
        self.state.last_error = None;
        self.state.last_result = None;

        Ok(Submission {
            ticket: Ticket {
                workflow: self.active,
                epoch: self.epoch,
            },
            request,
        })
    }

    /// Applies the outcome of a submission.
    ///
    /// Returns false, leaving state untouched, when the ticket is stale.
    pub fn complete(&mut self, ticket: Ticket, outcome: &Result<GeneratedImage>) -> bool {
        if ticket.epoch != self.epoch || ticket.workflow != self.active || !self.state.is_pending()
        {
            tracing::warn!(
                workflow = ?ticket.workflow,
                active = ?self.active,
                "discarding stale completion"
            );
            return false;
        }

        self.state.phase = Phase::Idle;
        match outcome {
            Ok(image) => {
                self.state.last_result = Some(image.clone());
                self.state.last_error = None;
            }
            Err(err) => {
                let message = err.user_message();
                self.state.last_error = Some(if message.trim().is_empty() {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                } else {
                    message
                });
                self.state.last_result = None;
            }
        }
        true
    }
}

/// Drives the active tab against a generator.
pub struct Studio<S> {
    generator: ImageGenerator<S>,
    state: StudioState,
}

impl<S: ImageService> Studio<S> {
    /// Creates a studio on the default tab.
    pub fn new(generator: ImageGenerator<S>) -> Self {
        Self {
            generator,
            state: StudioState::default(),
        }
    }

    /// Tab state.
    pub fn state(&self) -> &StudioState {
        &self.state
    }

    /// Mutable tab state, for editing inputs.
    pub fn state_mut(&mut self) -> &mut StudioState {
        &mut self.state
    }

    /// The generator submissions run through.
    pub fn generator(&self) -> &ImageGenerator<S> {
        &self.generator
    }

    /// Submits the active tab and waits for the outcome.
    pub async fn submit(&mut self) -> Result<GeneratedImage> {
        let Submission { ticket, request } = self.state.begin_submit()?;
        let outcome = self.generator.generate(&request).await;
        self.state.complete(ticket, &outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::image::generator::testing::{Call, FakeService, Reply};
    use crate::image::MOCKUP_FROM_IMAGE_INSTRUCTION;

    fn png(name: &str) -> EncodedImage {
        EncodedImage::from_data_url("data:image/png;base64,iVBORw0KGgo=", "image/png", name)
            .unwrap()
    }

    fn studio(replies: Vec<Reply>) -> Studio<FakeService> {
        Studio::new(ImageGenerator::new(FakeService::replying(replies)))
    }

    #[test]
    fn test_defaults() {
        let state = StudioState::default();
        assert_eq!(state.active(), Workflow::Mockup);
        assert_eq!(state.state().phase(), Phase::Idle);
        match state.state().inputs() {
            WorkflowInputs::Mockup(inputs) => {
                assert_eq!(inputs.product_description, "a white t-shirt");
                assert_eq!(inputs.source, ProductSource::Text);
            }
            other => panic!("unexpected inputs {other:?}"),
        }
        assert!(!state.state().can_submit());
    }

    #[test]
    fn test_editor_missing_image_is_rejected_locally() {
        let mut state = StudioState::new(Workflow::Editor);
        state.editor_mut().unwrap().instruction = "make the sky purple".into();

        let err = state.begin_submit().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.missing_field(), Some("image"));
        assert_eq!(state.state().phase(), Phase::Idle);
        assert_eq!(state.state().last_error(), Some("Please upload an image."));
    }

    #[test]
    fn test_editor_missing_instruction_is_rejected_locally() {
        let mut state = StudioState::new(Workflow::Editor);
        state.set_image(ImageSlot::EditorImage, png("cat.png")).unwrap();
        state.editor_mut().unwrap().instruction = "   ".into();

        let err = state.begin_submit().unwrap_err();
        assert_eq!(err.missing_field(), Some("instruction"));
        assert!(!state.state().is_pending());
        assert!(!state.state().can_submit());
    }

    #[test]
    fn test_mockup_validation_per_source() {
        let mut state = StudioState::default();
        assert_eq!(
            state.begin_submit().unwrap_err().missing_field(),
            Some("logo")
        );

        state.set_image(ImageSlot::Logo, png("logo.png")).unwrap();
        state.mockup_mut().unwrap().product_description.clear();
        assert_eq!(
            state.begin_submit().unwrap_err().missing_field(),
            Some("product description")
        );

        state.mockup_mut().unwrap().source = ProductSource::Image;
        assert_eq!(
            state.begin_submit().unwrap_err().missing_field(),
            Some("product image")
        );

        state.set_image(ImageSlot::Subject, png("mug.png")).unwrap();
        assert!(state.state().can_submit());
    }

    #[test]
    fn test_generator_missing_prompt() {
        let mut state = StudioState::new(Workflow::Generator);
        let err = state.begin_submit().unwrap_err();
        assert_eq!(err.missing_field(), Some("prompt"));
        assert_eq!(state.state().last_error(), Some("Please enter a prompt."));
    }

    #[test]
    fn test_set_image_rejects_other_tab_slot() {
        let mut state = StudioState::new(Workflow::Generator);
        assert!(state.set_image(ImageSlot::Logo, png("logo.png")).is_err());
        assert_eq!(
            state.state().inputs(),
            &WorkflowInputs::Generator(GeneratorInputs::default())
        );
    }

    #[test]
    fn test_upload_decode_failure_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = StudioState::default();
        state.set_image(ImageSlot::Logo, png("logo.png")).unwrap();
        let before = state.state().inputs().clone();

        let err = state
            .upload(ImageSlot::Logo, dir.path().join("missing.png"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(state.state().inputs(), &before);
        assert!(state.state().last_error().is_none());
    }

    #[test]
    fn test_pending_blocks_second_submission() {
        let mut state = StudioState::new(Workflow::Generator);
        state.generator_mut().unwrap().prompt = "a fox".into();

        let first = state.begin_submit().unwrap();
        assert!(state.state().is_pending());
        assert!(!state.state().can_submit());
        assert!(state.begin_submit().is_err());
        assert!(state.state().is_pending());

        assert!(state.complete(first.ticket, &Ok(GeneratedImage::new("IMG"))));
        assert_eq!(state.state().phase(), Phase::Idle);
        assert_eq!(state.state().last_result().unwrap().data, "IMG");
    }

    #[test]
    fn test_submit_clears_previous_result_and_error() {
        let mut state = StudioState::new(Workflow::Generator);
        state.generator_mut().unwrap().prompt = "a fox".into();

        let first = state.begin_submit().unwrap();
        state.complete(first.ticket, &Ok(GeneratedImage::new("OLD")));

        let second = state.begin_submit().unwrap();
        assert!(state.state().last_result().is_none());
        state.complete(second.ticket, &Err(StudioError::Service("overloaded".into())));
        assert_eq!(state.state().last_error(), Some("overloaded"));
        assert!(state.state().last_result().is_none());

        let third = state.begin_submit().unwrap();
        assert!(state.state().last_error().is_none());
        state.complete(third.ticket, &Ok(GeneratedImage::new("NEW")));
    }

    #[test]
    fn test_empty_service_message_uses_fallback() {
        let mut state = StudioState::new(Workflow::Generator);
        state.generator_mut().unwrap().prompt = "a fox".into();
        let submission = state.begin_submit().unwrap();
        state.complete(submission.ticket, &Err(StudioError::Service(String::new())));
        assert_eq!(state.state().last_error(), Some(UNKNOWN_ERROR_MESSAGE));
    }

    #[test]
    fn test_stale_completion_after_tab_switch_is_discarded() {
        let mut state = StudioState::new(Workflow::Generator);
        state.generator_mut().unwrap().prompt = "a fox".into();
        let submission = state.begin_submit().unwrap();

        state.switch_to(Workflow::Editor);
        assert!(!state.complete(submission.ticket, &Ok(GeneratedImage::new("LATE"))));
        assert!(state.state().last_result().is_none());
        assert_eq!(state.active(), Workflow::Editor);

        // Returning to the original tab does not revive the old ticket.
        state.switch_to(Workflow::Generator);
        assert!(!state.complete(submission.ticket, &Ok(GeneratedImage::new("LATE"))));
        assert!(state.state().last_result().is_none());
        assert!(!state.state().is_pending());
    }

    #[tokio::test]
    async fn test_mockup_from_text_end_to_end() {
        let mut studio = studio(vec![Reply::Image("MOCKUP")]);
        let state = studio.state_mut();
        state.set_image(ImageSlot::Logo, png("logo.png")).unwrap();
        let inputs = state.mockup_mut().unwrap();
        inputs.source = ProductSource::Text;
        inputs.product_description = "a black coffee mug".into();

        let image = studio.submit().await.unwrap();
        assert_eq!(image.data, "MOCKUP");

        let calls = studio.generator().service().calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Content { model, body } => {
                assert_eq!(model, "gemini-2.5-flash-image");
                let parts = body.parts();
                assert_eq!(parts.len(), 2);
                assert_eq!(parts[0].as_inline_data().unwrap().data, "iVBORw0KGgo=");
                assert!(parts[1]
                    .as_text()
                    .unwrap()
                    .contains("product mockup of a black coffee mug."));
            }
            other => panic!("unexpected call {other:?}"),
        }

        let state = studio.state().state();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.last_result().unwrap().data, "MOCKUP");
        assert!(state.last_error().is_none());
    }

    #[tokio::test]
    async fn test_mockup_from_image_end_to_end() {
        let mut studio = studio(vec![Reply::Image("PLACED")]);
        let state = studio.state_mut();
        state.set_image(ImageSlot::Logo, png("logo.png")).unwrap();
        state.set_image(ImageSlot::Subject, png("mug.png")).unwrap();
        state.mockup_mut().unwrap().source = ProductSource::Image;

        studio.submit().await.unwrap();

        match &studio.generator().service().calls()[0] {
            Call::Content { body, .. } => {
                assert_eq!(body.parts().len(), 3);
                assert_eq!(body.parts()[2].as_text(), Some(MOCKUP_FROM_IMAGE_INSTRUCTION));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_call() {
        let mut studio = studio(vec![Reply::Image("UNUSED")]);
        studio.state_mut().switch_to(Workflow::Editor);

        let err = studio.submit().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(studio.generator().service().calls().is_empty());
    }

    #[tokio::test]
    async fn test_no_image_response_populates_error() {
        let mut studio = studio(vec![Reply::Parts(vec![])]);
        studio.state_mut().switch_to(Workflow::Editor);
        let state = studio.state_mut();
        state.set_image(ImageSlot::EditorImage, png("cat.png")).unwrap();
        state.editor_mut().unwrap().instruction = "add a retro filter".into();

        assert!(studio.submit().await.is_err());
        let state = studio.state().state();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(
            state.last_error(),
            Some("No image data found in the API response.")
        );
        assert!(state.last_result().is_none());
    }

    #[tokio::test]
    async fn test_service_error_message_is_verbatim() {
        let mut studio = studio(vec![Reply::Fail("Quota exceeded for this project")]);
        studio.state_mut().switch_to(Workflow::Generator);
        studio.state_mut().generator_mut().unwrap().prompt = "a fox".into();

        studio.submit().await.unwrap_err();
        assert_eq!(
            studio.state().state().last_error(),
            Some("Quota exceeded for this project")
        );
    }

    #[tokio::test]
    async fn test_api_error_message_is_shown_without_prefix() {
        let mut studio = studio(vec![Reply::Error(StudioError::Api {
            status: 400,
            message: "Request contains an invalid argument.".into(),
        })]);
        studio.state_mut().switch_to(Workflow::Generator);
        studio.state_mut().generator_mut().unwrap().prompt = "a fox".into();

        let err = studio.submit().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(
            studio.state().state().last_error(),
            Some("Request contains an invalid argument.")
        );
    }

    #[test]
    fn test_rate_limit_message_is_readable() {
        let mut state = StudioState::new(Workflow::Generator);
        state.generator_mut().unwrap().prompt = "a fox".into();
        let submission = state.begin_submit().unwrap();

        let outcome = Err(StudioError::RateLimited {
            retry_after: Some(std::time::Duration::from_secs(12)),
        });
        assert!(state.complete(submission.ticket, &outcome));
        assert_eq!(
            state.state().last_error(),
            Some("Rate limited; try again in 12 seconds.")
        );
    }
}
