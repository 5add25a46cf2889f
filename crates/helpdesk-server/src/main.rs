use std::sync::Arc;

use anyhow::Context;
use helpdesk::{KnowledgeStore, VectorStoreKind};
use tracing_subscriber::EnvFilter;

use helpdesk_server::adapters::{
    JsonFileMemoryStore, LocalKnowledgeStore, OpenAiChat, OpenAiEmbeddings, QdrantKnowledgeStore,
    SimulatedCrm, SimulatedMailbox, SimulatedTicketDesk,
};
use helpdesk_server::application::{
    AgentConfig, AgentMemory, BatchRunner, Connectors, CustomerServiceAgent,
};
use helpdesk_server::config::Settings;
use helpdesk_server::services::scheduler;
use helpdesk_server::tools::{KnowledgeTool, RoutingVocabulary};
use helpdesk_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env().context("Invalid configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("🎧 Helpdesk API initializing...");

    if settings.api_key.is_some() {
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No API_KEY set - authentication disabled");
    }

    if !settings.llm_configured() {
        tracing::warn!("⚠️  No OPENAI_API_KEY set - LLM calls will fail and tools will degrade");
    }

    // LLM and embeddings
    let llm = Arc::new(OpenAiChat::new(
        settings.openai_api_key.clone(),
        &settings.openai_base_url,
        settings.llm_model.clone(),
    ));
    let embeddings = Arc::new(OpenAiEmbeddings::new(
        settings.openai_api_key.clone(),
        &settings.openai_base_url,
        settings.rag_embedding_model.clone(),
    ));
    tracing::info!("🧬 LLM initialized (model: {})", settings.llm_model);

    // Knowledge store
    let store = if settings.rag_enabled {
        open_knowledge_store(&settings).await
    } else {
        tracing::info!("📚 RAG disabled");
        None
    };
    let knowledge = KnowledgeTool::new(llm.clone(), embeddings, store, settings.rag_enabled);

    // Connectors
    let connectors = Connectors {
        email: Arc::new(SimulatedMailbox::new(settings.email_provider())),
        crm: Arc::new(SimulatedCrm::new(settings.crm_provider())),
        tickets: Arc::new(SimulatedTicketDesk::new(settings.ticket_provider())),
    };

    // Memory
    let memory = Arc::new(
        AgentMemory::load(Arc::new(JsonFileMemoryStore::new(
            settings.memory_file_path.clone(),
        )))
        .await,
    );

    let vocabulary = RoutingVocabulary {
        departments: settings.departments.clone(),
        priorities: settings.ticket_priorities.clone(),
        categories: settings.ticket_categories.clone(),
    };
    let agent = Arc::new(CustomerServiceAgent::new(
        llm,
        knowledge,
        &vocabulary,
        connectors,
        memory,
        AgentConfig {
            temperature: settings.llm_temperature,
            max_iterations: settings.agent_max_iterations,
            verbose: settings.agent_verbose,
            email_batch_size: settings.email_batch_size,
        },
    ));
    let batch = Arc::new(BatchRunner::new(agent.clone()));

    if let Some(_handle) =
        scheduler::maybe_start_scheduler(batch.clone(), settings.email_poll_interval_secs)
    {
        tracing::info!("📅 Email polling scheduler started");
    } else {
        tracing::info!("📅 Email polling disabled (EMAIL_POLL_INTERVAL_SECS not set)");
    }

    let state = AppState {
        agent,
        batch,
        llm_model: settings.llm_model.clone(),
        api_key: settings.api_key.clone(),
        debug: settings.api_debug,
    };
    let router = build_router(state);

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Helpdesk API ready on http://{}", address);

    axum::serve(listener, router)
        .await
        .context("Server error")?;

    Ok(())
}

/// Open the configured vector store; failures disable retrieval
async fn open_knowledge_store(settings: &Settings) -> Option<Arc<dyn KnowledgeStore>> {
    match settings.vector_store_kind() {
        Some(VectorStoreKind::Local) => {
            match LocalKnowledgeStore::open(&settings.rag_vector_store_path, &settings.rag_collection)
                .await
            {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    tracing::warn!("⚠️  Failed to open local knowledge store: {}", e);
                    None
                }
            }
        }
        Some(VectorStoreKind::Qdrant) => {
            let Some(url) = settings.rag_vector_store_url.as_deref() else {
                tracing::warn!("⚠️  No RAG_VECTOR_STORE_URL set - knowledge base disabled");
                return None;
            };
            match QdrantKnowledgeStore::connect(
                url,
                settings.rag_vector_store_api_key.clone(),
                &settings.rag_collection,
                settings.rag_embedding_dimensions,
            )
            .await
            {
                Ok(store) => {
                    tracing::info!("🌊 Qdrant knowledge store connected");
                    Some(Arc::new(store))
                }
                Err(e) => {
                    tracing::warn!("⚠️  Failed to connect to Qdrant: {}", e);
                    None
                }
            }
        }
        None => {
            tracing::warn!(
                "⚠️  Unknown RAG_VECTOR_STORE_TYPE '{}' - knowledge base disabled",
                settings.rag_vector_store_type
            );
            None
        }
    }
}
