use std::sync::Arc;

use crate::context::PromptTemplate;
use crate::core::config::{AppPaths, ConfigService, Settings};
use crate::feedback::FeedbackService;
use crate::llm::{ChatClient, EmbeddingModel, OpenAiChatClient, OpenAiEmbeddingModel};
use crate::rag::{build_vector_store, VectorStore};

pub mod error;

use error::InitializationError;

/// Global application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub feedback: FeedbackService,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// This process includes:
    /// 1. Loading and validating configuration
    /// 2. Building the vector store selected by `app.ai.vectorstore`
    /// 3. Loading the feedback prompt template
    /// 4. Creating the chat-completion client
    ///
    /// Any failure here is fatal to startup.
    pub async fn initialize(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let config = ConfigService::new(paths.clone());
        let settings = config
            .load_settings()
            .map_err(|e| InitializationError::Config(e.into()))?;

        let store = build_vector_store(&settings, paths.as_ref(), || {
            let model = OpenAiEmbeddingModel::from_settings(&settings.llm)?;
            Ok(Arc::new(model) as Arc<dyn EmbeddingModel>)
        })
        .await?;

        let chat: Arc<dyn ChatClient> = Arc::new(
            OpenAiChatClient::from_settings(&settings.llm)
                .map_err(|e| InitializationError::Llm(e.into()))?,
        );

        Self::from_parts(&paths, settings, store, chat)
    }

    /// Wires already-built collaborators into the state.
    ///
    /// Fails when no vector store was built, since the feedback endpoint cannot
    /// be served without one. `paths` only resolves the prompt location.
    pub fn from_parts(
        paths: &AppPaths,
        settings: Settings,
        store: Option<Arc<dyn VectorStore>>,
        chat: Arc<dyn ChatClient>,
    ) -> Result<Arc<Self>, InitializationError> {
        let store = store.ok_or_else(|| {
            InitializationError::MissingVectorStore(
                settings
                    .vector_store_backend()
                    .map(|backend| format!("{:?}", backend))
                    .unwrap_or_else(|| "unset".to_string()),
            )
        })?;

        let prompt_path = paths.resolve(&settings.prompts.feedback);
        let prompt = PromptTemplate::load(&prompt_path)
            .map_err(|e| InitializationError::Prompt(e.into()))?;
        tracing::info!("Loaded feedback prompt from {}", prompt_path.display());

        let feedback = FeedbackService::new(
            store,
            chat,
            Arc::new(prompt),
            settings.llm.clone(),
        );

        Ok(Arc::new(AppState {
            settings: Arc::new(settings),
            feedback,
        }))
    }
}
