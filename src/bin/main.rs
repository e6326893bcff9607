use chrono::{Duration, Utc};
use relevant_memories::{
    ConstantState, GeminiClient, InMemoryAssociativeMemory, LanguageModel,
    MockLanguageModel, RelevantMemorySelector, SystemClock,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let agent_name = std::env::var("AGENT_NAME").unwrap_or_else(|_| "Alice".to_string());
    let retrieval_count: usize = std::env::var("RETRIEVAL_COUNT")
        .unwrap_or_else(|_| "25".to_string())
        .parse()?;
    let verbose = std::env::var("VERBOSE")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    let model: Arc<dyn LanguageModel> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => {
            info!("Language model: Gemini");
            Arc::new(GeminiClient::new(key)?)
        }
        _ => {
            warn!("GEMINI_API_KEY not set, using offline mock language model");
            Arc::new(MockLanguageModel::new())
        }
    };

    // Seed a small memory so the demo has something to filter
    let start = Utc::now() - Duration::days(3);
    let memory = Arc::new(InMemoryAssociativeMemory::new());
    let seeded = [
        (0, "The village well is dry."),
        (1, "The baker raised the price of bread."),
        (2, "Rain refilled the village well."),
        (3, "Bob promised to help repair the mill."),
    ];
    for (day, text) in seeded {
        memory
            .add(format!("{} {}", agent_name, text), start + Duration::days(day))
            .await;
    }

    let mut selector = RelevantMemorySelector::builder(model, memory, agent_name.clone())
        .component(
            "observation",
            Arc::new(ConstantState::new("Villagers gather near the well.")),
        )
        .component(
            "identity",
            Arc::new(ConstantState::new(format!("{} runs the village mill.", agent_name))),
        )
        .clock(Arc::new(SystemClock))
        .retrieval_count(retrieval_count)
        .verbose(verbose)
        .build()?;

    let relevant = selector.make_context().await?;

    println!("\n=== RELEVANT MEMORIES ===");
    println!("{}", relevant);

    if let Some(record) = selector.last_record() {
        println!("\nRecord: {} (digest {})", record.record_id, record.digest());
        println!("Query: {}", record.query);
    }

    Ok(())
}
