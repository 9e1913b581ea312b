// Store-backed report and list behaviour. Run with `cargo test -- --ignored` and a DATABASE_URL.
mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use sqlx::PgPool;

use process_control_api::server::ServiceRole;
use process_control_api::services::{ListService, ProcessInput, ProcessService, ReportService};

fn input(object: &str, date: &str) -> ProcessInput {
    ProcessInput {
        simplified_object: Some(object.to_string()),
        opening_date: Some(date.to_string()),
        ..Default::default()
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn status_breakdown_keeps_empty_statuses_in_order(pool: PgPool) -> Result<()> {
    let processes = ProcessService::new(pool.clone());
    let mut p = input("Compra de carteiras", "2025-01-10");
    p.status = Some("Em andamento".to_string());
    processes.create(p).await?;

    let rows = ReportService::new(pool).status_breakdown().await?;
    let seeded: Vec<&str> = rows.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(
        seeded,
        vec![
            "Em elaboração",
            "Em andamento",
            "Em análise",
            "Aguardando assinatura",
            "Concluído",
            "Cancelado"
        ]
    );
    assert_eq!(rows[0].total, 0);
    assert_eq!(rows[1].total, 1);
    assert_eq!(rows.iter().map(|r| r.total).sum::<i64>(), 1);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn summary_groups_and_counts_distinct_secretaries(pool: PgPool) -> Result<()> {
    let processes = ProcessService::new(pool.clone());

    let mut a = input("Merenda", "2025-01-10");
    a.responsible = Some("Maria Silva".to_string());
    a.modality = Some("Pregão".to_string());
    a.participating_secretaries = Some(vec!["Educação".to_string()]);
    let a_id = processes.create(a).await?;

    let mut b = input("Uniformes", "2025-01-20");
    b.responsible = Some("Maria Silva".to_string());
    b.modality = Some("Pregão".to_string());
    processes.create(b).await?;

    let mut c = input("Ponte", "2025-03-02");
    c.responsible = Some("João Lima".to_string());
    c.participating_secretaries = Some(vec!["Obras".to_string()]);
    processes.create(c).await?;

    // A secretary nobody references yet
    sqlx::query("INSERT INTO secretaries (name) VALUES ('Cultura')")
        .execute(&pool)
        .await?;

    // Same secretary linked twice to one process
    sqlx::query(
        "INSERT INTO participating_secretaries (process_id, secretary_id) \
         SELECT $1, id FROM secretaries WHERE name = 'Educação'",
    )
    .bind(a_id)
    .execute(&pool)
    .await?;

    let summary = ReportService::new(pool.clone()).summary().await?;
    assert_eq!(summary.total, 3);

    let by_responsible: Vec<(&str, i64)> = summary
        .by_responsible
        .iter()
        .map(|r| (r.responsible.as_str(), r.total))
        .collect();
    assert_eq!(by_responsible, vec![("Maria Silva", 2), ("João Lima", 1)]);

    // Null modality is excluded
    assert_eq!(summary.by_modality.len(), 1);
    assert_eq!(summary.by_modality[0].modality, "Pregão");
    assert_eq!(summary.by_modality[0].total, 2);

    let by_month: Vec<(&str, i64)> = summary
        .by_month
        .iter()
        .map(|m| (m.month.as_str(), m.total))
        .collect();
    assert_eq!(by_month, vec![("2025-01", 2), ("2025-03", 1)]);

    let by_secretary: Vec<(&str, i64)> = summary
        .by_secretary
        .iter()
        .map(|s| (s.secretary.as_str(), s.total))
        .collect();
    assert_eq!(
        by_secretary,
        vec![("Educação", 1), ("Obras", 1), ("Cultura", 0)]
    );
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn summary_json_uses_camel_case_keys(pool: PgPool) -> Result<()> {
    let (status, body) = common::send(
        common::app_with_pool(ServiceRole::Reports, pool)?,
        common::json_request(Method::GET, "/summary", None, None),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    for key in ["byResponsible", "byModality", "byMonth", "bySecretary"] {
        assert!(body[key].is_array(), "missing {}: {}", key, body);
    }
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn reference_lists_are_ordered(pool: PgPool) -> Result<()> {
    let processes = ProcessService::new(pool.clone());
    let mut p = input("Reforma", "2025-01-01");
    p.responsible = Some("Zélia".to_string());
    p.participating_secretaries = Some(vec!["Saúde".to_string(), "Administração".to_string()]);
    processes.create(p).await?;
    let mut p = input("Pintura", "2025-01-02");
    p.responsible = Some("Bruno".to_string());
    processes.create(p).await?;

    let lists = ListService::new(pool.clone());
    let statuses = lists.statuses().await?;
    assert_eq!(statuses.first().map(|s| s.order_num), Some(1));
    assert!(statuses.windows(2).all(|w| w[0].order_num <= w[1].order_num));

    let responsibles: Vec<String> = lists.responsibles().await?.into_iter().map(|r| r.name).collect();
    assert_eq!(responsibles, vec!["Bruno", "Zélia"]);

    let (status, body) = common::send(
        common::app_with_pool(ServiceRole::Lists, pool)?,
        common::json_request(Method::GET, "/secretaries", None, None),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Administração");
    assert_eq!(body[1]["name"], "Saúde");
    Ok(())
}
