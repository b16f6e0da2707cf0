#[cfg(test)]
mod tests {
    use comanda::{BootstrapError, Client, MIGRATIONS, SchemaStatus};
    use comanda_tests::{MockExecutor, init_logs, silent_logs};
    use futures::future::join_all;
    use std::{sync::Arc, time::Duration};

    fn is_ddl(sql: &str) -> bool {
        sql.starts_with("CREATE TABLE") || sql.starts_with("ALTER TABLE")
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_bootstrap() {
        init_logs();
        let executor = MockExecutor::new().with_delay(Duration::from_millis(20));
        let client = Client::new(executor.clone());
        let results = join_all((0..8).map(|_| client.ensure_schema())).await;
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(executor.count(|v| is_ddl(&v.sql)), MIGRATIONS.len());
        assert_eq!(client.schema().status(), SchemaStatus::Ready);

        client.ensure_schema().await.unwrap();
        client.table("orders").fetch_all().await.unwrap();
        let sql = executor
            .statements()
            .into_iter()
            .map(|v| v.sql)
            .collect::<Vec<_>>();
        assert_eq!(sql.len(), MIGRATIONS.len() + 1);
        assert!(
            sql.iter()
                .zip(client.schema().statements())
                .all(|(a, b)| *a == b.sql),
            "Applied in the declared order"
        );
        assert_eq!(sql.last().map(String::as_str), Some("SELECT * FROM orders"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_shared_then_retried() {
        init_logs();
        let executor = MockExecutor::new().with_delay(Duration::from_millis(20));
        executor.fail("permission denied for schema public");
        let client = Client::new(executor.clone());
        silent_logs! {
            let results = join_all((0..4).map(|_| client.ensure_schema())).await;
            let errors = results
                .iter()
                .map(|v| {
                    v.as_ref()
                        .expect_err("Every caller observes the failure")
                        .downcast_ref::<BootstrapError>()
                        .expect("Expected a bootstrap error")
                        .0
                        .clone()
                })
                .collect::<Vec<_>>();
            assert!(errors.windows(2).all(|v| Arc::ptr_eq(&v[0], &v[1])));
            assert!(format!("{:#}", errors[0]).contains("permission denied"));
        }
        assert_eq!(executor.statements().len(), 1, "Stops at the first failure");
        assert_eq!(client.schema().status(), SchemaStatus::Uninitialized);

        silent_logs! {
            assert!(client.table("orders").fetch_all().await.is_err());
        }
        assert!(
            !executor.statements().iter().any(|v| v.sql.starts_with("SELECT")),
            "Queries wait for the schema"
        );

        executor.respond(|_| Ok(Vec::new()));
        executor.clear();
        client.ensure_schema().await.expect("Retry should succeed");
        assert_eq!(executor.count(|v| is_ddl(&v.sql)), MIGRATIONS.len());
        assert_eq!(client.schema().status(), SchemaStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_caller_leaves_bootstrap_resumable() {
        init_logs();
        let executor = MockExecutor::new().with_delay(Duration::from_millis(50));
        let client = Client::new(executor.clone());
        assert!(
            tokio::time::timeout(Duration::from_millis(120), client.ensure_schema())
                .await
                .is_err()
        );
        assert_eq!(client.schema().status(), SchemaStatus::Initializing);
        let started = executor.statements().len();
        assert!(started > 0 && started < MIGRATIONS.len());

        client.ensure_schema().await.expect("Bootstrap should resume");
        assert_eq!(client.schema().status(), SchemaStatus::Ready);
        assert_eq!(
            executor.count(|v| is_ddl(&v.sql)),
            MIGRATIONS.len(),
            "No statement runs twice"
        );
    }

    #[tokio::test]
    async fn clones_share_the_bootstrap() {
        let executor = MockExecutor::new();
        let client = Client::new(executor.clone());
        let other = client.clone();
        client.ensure_schema().await.unwrap();
        assert_eq!(other.schema().status(), SchemaStatus::Ready);
        other.ensure_schema().await.unwrap();
        assert_eq!(executor.statements().len(), MIGRATIONS.len());
    }
}
