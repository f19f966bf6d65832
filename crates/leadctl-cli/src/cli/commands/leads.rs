//! Lead command handlers.

use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table};
use leadctl_core::api::ApiClient;
use leadctl_core::api::types::LeadDraft;
use leadctl_core::leads::ListQuery;

pub async fn list(client: &ApiClient, query: &ListQuery) -> Result<()> {
    let page = client.list_leads(query).await.context("list leads")?;

    if page.data.is_empty() {
        println!("No leads match the current filters.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["ID", "Name", "Email", "Phone", "Status"]);
    for lead in &page.data {
        table.add_row([
            lead.id.to_string(),
            lead.name.clone(),
            lead.email.clone(),
            lead.phone.clone().unwrap_or_else(|| "-".to_string()),
            lead.status
                .as_ref()
                .map_or_else(|| "-".to_string(), |status| status.name.clone()),
        ]);
    }

    println!("{table}");
    println!("page {}/{}", query.page, page.last_page.max(1));
    Ok(())
}

pub async fn statuses(client: &ApiClient) -> Result<()> {
    let statuses = client.list_statuses().await.context("list statuses")?;

    if statuses.is_empty() {
        println!("No statuses configured.");
    } else {
        for status in statuses {
            println!("{:>4}  {}", status.id, status.name);
        }
    }
    Ok(())
}

pub async fn create(client: &ApiClient, draft: &LeadDraft) -> Result<()> {
    let lead = client.create_lead(draft).await.context("create lead")?;
    println!("Created lead #{} {}.", lead.id, lead.name);
    Ok(())
}

pub async fn update(client: &ApiClient, id: u64, draft: &LeadDraft) -> Result<()> {
    let lead = client
        .update_lead(id, draft)
        .await
        .with_context(|| format!("update lead {id}"))?;
    println!("Updated lead #{}.", lead.id);
    Ok(())
}
