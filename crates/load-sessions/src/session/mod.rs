//! 模拟 API 客户端会话
//!
//! 每个会话代表一个模拟用户：按权重随机挑选任务，串行发出请求，
//! 用响应中发现的实体 ID 更新本地状态，并把每个请求的结果上报给 Reporter。

pub mod state;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::envelope::{ListShape, created_id};
use crate::payloads::PayloadTemplates;
use crate::profile::SessionProfile;
use crate::report::{FailureRecord, Reporter};
use crate::tasks::Operation;
use crate::transport::{ApiRequest, ApiResponse, Transport};
use state::{EntityId, SessionState};

/// 单个节拍的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// 依赖的 ID 列表为空，未发出请求
    Skipped,
    Succeeded,
    Failed(FailureRecord),
}

impl TaskOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// 模拟 API 客户端会话
pub struct ApiSession {
    id: usize,
    profile: Arc<SessionProfile>,
    transport: Arc<dyn Transport>,
    reporter: Arc<dyn Reporter>,
    payloads: PayloadTemplates,
    state: SessionState,
    rng: StdRng,
}

impl ApiSession {
    pub fn new(
        id: usize,
        profile: Arc<SessionProfile>,
        transport: Arc<dyn Transport>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self::with_rng(id, profile, transport, reporter, StdRng::from_entropy())
    }

    /// 使用固定种子创建会话，便于复现任务序列
    pub fn with_seed(
        id: usize,
        profile: Arc<SessionProfile>,
        transport: Arc<dyn Transport>,
        reporter: Arc<dyn Reporter>,
        seed: u64,
    ) -> Self {
        Self::with_rng(id, profile, transport, reporter, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        id: usize,
        profile: Arc<SessionProfile>,
        transport: Arc<dyn Transport>,
        reporter: Arc<dyn Reporter>,
        rng: StdRng,
    ) -> Self {
        Self {
            id,
            profile,
            transport,
            reporter,
            payloads: PayloadTemplates::new(),
            state: SessionState::new(),
            rng,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    /// 会话启动：拉取一次商品列表，填充初始商品 ID
    ///
    /// 失败或响应无法解析时列表保持为空，不影响后续节拍。
    pub async fn on_start(&mut self) -> TaskOutcome {
        self.execute(Operation::ListProducts).await
    }

    /// 执行一个节拍：按权重挑选任务并执行
    pub async fn tick(&mut self) -> (Operation, TaskOutcome) {
        let operation = self.profile.tasks.pick(&mut self.rng);
        let outcome = self.execute(operation).await;
        (operation, outcome)
    }

    /// 本次节拍后的思考时间
    pub fn think_time(&mut self) -> Duration {
        self.profile.think_time.sample(&mut self.rng)
    }

    /// 会话主循环
    ///
    /// 启动后反复执行节拍与思考时间，直到 shutdown 置为 true 或发送端被丢弃。
    /// 返回会话结束时的状态。
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> SessionState {
        info!(session = self.id, profile = %self.profile.name, "会话启动");

        if !*shutdown.borrow() {
            self.on_start().await;
        }

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.tick().await;

            let pause = self.think_time();
            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(
            session = self.id,
            products = self.state.product_ids.len(),
            carts = self.state.cart_ids.len(),
            users = self.state.user_ids.len(),
            "会话结束"
        );
        self.state
    }

    /// 执行指定操作
    ///
    /// 依赖 ID 的操作在列表为空时直接跳过，不发请求也不上报。
    pub async fn execute(&mut self, operation: Operation) -> TaskOutcome {
        let target_id = match operation.required_entity() {
            Some(entity) => match self.state.ids(entity).choose(&mut self.rng) {
                Some(id) => Some(id),
                None => {
                    debug!(session = self.id, %operation, %entity, "没有已知 ID，跳过任务");
                    return TaskOutcome::Skipped;
                }
            },
            None => None,
        };

        let request = self.build_request(operation, target_id);
        let started = Instant::now();
        let result = self.transport.send(&request).await;
        let elapsed = started.elapsed();

        match result {
            Ok(response) if operation.is_success(response.status) => {
                self.apply_success(operation, target_id, &response);
                self.reporter.record_success(operation, elapsed);
                TaskOutcome::Succeeded
            }
            Ok(response) => {
                let failure = FailureRecord::status(operation, target_id, response.status);
                self.report_failure(failure, elapsed)
            }
            Err(e) => {
                debug!(session = self.id, code = e.code(), "传输层错误");
                let failure = FailureRecord::transport(operation, target_id, e);
                self.report_failure(failure, elapsed)
            }
        }
    }

    fn report_failure(&self, failure: FailureRecord, elapsed: Duration) -> TaskOutcome {
        warn!(session = self.id, failure = %failure, "请求失败");
        self.reporter.record_failure(failure.clone(), elapsed);
        TaskOutcome::Failed(failure)
    }

    fn build_request(&mut self, operation: Operation, target_id: Option<EntityId>) -> ApiRequest {
        let path = operation.path(&self.profile.routes, target_id);
        let request = ApiRequest::new(operation.method(), path);

        let body: Option<Value> = match operation {
            Operation::CreateProduct => Some(self.payloads.product(&mut self.rng).into()),
            Operation::UpdateProduct => Some(self.payloads.product_update(&mut self.rng).into()),
            Operation::CreateCart => Some(
                self.payloads
                    .cart(&mut self.rng, &self.state.product_ids, &self.state.user_ids)
                    .into(),
            ),
            Operation::AddProductToCart => Some(
                self.payloads
                    .cart_products(&mut self.rng, &self.state.product_ids)
                    .into(),
            ),
            Operation::UpdateCart => Some(
                self.payloads
                    .cart_update(&mut self.rng, &self.state.product_ids, &self.state.user_ids)
                    .into(),
            ),
            Operation::CreateUser => Some(self.payloads.user(&mut self.rng).into()),
            Operation::Login => Some(self.payloads.login().into()),
            _ => None,
        };

        match body {
            Some(body) => request.with_json(body),
            None => request,
        }
    }

    /// 成功响应对会话状态的影响
    fn apply_success(
        &mut self,
        operation: Operation,
        target_id: Option<EntityId>,
        response: &ApiResponse,
    ) {
        let envelope_key = self.profile.envelope_key.as_str();

        if let Some(entity) = operation.listed_entity() {
            match ListShape::parse(&response.body, envelope_key).ids() {
                Some(ids) => {
                    let list = self.state.ids_mut(entity);
                    list.replace_with(ids);
                    debug!(session = self.id, %entity, known = ?list.to_vec(), "刷新 ID 列表");
                }
                None => {
                    debug!(session = self.id, %operation, "列表响应无法识别，保留原有 ID");
                }
            }
        }

        if let Some(entity) = operation.created_entity() {
            match created_id(&response.body, envelope_key) {
                Some(id) => {
                    self.state.ids_mut(entity).push(id);
                    debug!(session = self.id, %entity, id, "记录新建实体 ID");
                }
                None => {
                    debug!(session = self.id, %operation, "创建响应中没有可解析的 ID");
                }
            }
        }

        if operation == Operation::DeleteProduct {
            if let Some(id) = target_id {
                self.state.product_ids.remove(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TallyReporter;
    use crate::tasks::{TaskDescriptor, TaskSet};
    use crate::testing::ScriptedTransport;
    use reqwest::Method;

    fn session_with(
        transport: &Arc<ScriptedTransport>,
        reporter: &TallyReporter,
        profile: SessionProfile,
    ) -> ApiSession {
        ApiSession::with_seed(
            1,
            Arc::new(profile),
            transport.clone(),
            Arc::new(reporter.clone()),
            99,
        )
    }

    fn storefront_session(
        transport: &Arc<ScriptedTransport>,
        reporter: &TallyReporter,
    ) -> ApiSession {
        session_with(transport, reporter, SessionProfile::storefront())
    }

    #[tokio::test]
    async fn test_id_dependent_tasks_skip_without_ids() {
        let transport = Arc::new(ScriptedTransport::new());
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);

        for operation in Operation::ALL {
            if operation.required_entity().is_some() {
                assert_eq!(session.execute(operation).await, TaskOutcome::Skipped);
            }
        }

        assert!(transport.requests().is_empty());
        assert_eq!(reporter.totals().requests, 0);
    }

    #[tokio::test]
    async fn test_on_start_with_enveloped_list() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, r#"{"data":[{"id":1},{"id":2}]}"#);
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);

        assert_eq!(session.on_start().await, TaskOutcome::Succeeded);
        assert_eq!(session.state().product_ids.to_vec(), vec![1, 2]);

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/product");

        // 后续的 get product 只会从 {1, 2} 中选
        for _ in 0..10 {
            transport.push_json(200, r#"{"data":{"id":1}}"#);
            session.execute(Operation::GetProduct).await;
        }
        for request in transport.requests().iter().skip(1) {
            assert!(request.path == "/product/1" || request.path == "/product/2");
        }
    }

    #[tokio::test]
    async fn test_on_start_bare_array_is_capped() {
        let transport = Arc::new(ScriptedTransport::new());
        let items: Vec<String> = (1..=8).map(|i| format!(r#"{{"id":{i}}}"#)).collect();
        transport.push_json(200, &format!("[{}]", items.join(",")));
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);

        session.on_start().await;
        assert_eq!(session.state().product_ids.to_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_on_start_failure_is_not_fatal() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(503, "oops");
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);

        let outcome = session.on_start().await;
        assert!(matches!(outcome, TaskOutcome::Failed(_)));
        assert!(session.state().product_ids.is_empty());
        assert_eq!(reporter.tally(Operation::ListProducts).failures, 1);

        // 200 但响应体无法识别：不算失败，列表保持为空
        transport.push_json(200, "<html>maintenance</html>");
        assert_eq!(session.on_start().await, TaskOutcome::Succeeded);
        assert!(session.state().product_ids.is_empty());
    }

    #[tokio::test]
    async fn test_list_refresh_caps() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, r#"[{"id":1},{"id":2},{"id":3},{"id":4},{"id":5}]"#);
        transport.push_json(200, r#"{"data":[{"id":10},{"id":11},{"id":12},{"id":13}]}"#);
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);

        session.execute(Operation::ListCarts).await;
        assert_eq!(session.state().cart_ids.to_vec(), vec![1, 2, 3]);

        session.execute(Operation::ListUsers).await;
        assert_eq!(session.state().user_ids.to_vec(), vec![10, 11, 12]);

        assert_eq!(transport.requests()[0].path, "/carts");
        assert_eq!(transport.requests()[1].path, "/users");
    }

    #[tokio::test]
    async fn test_create_user_appends_id() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(201, r#"{"data":{"id":4321}}"#);
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);

        assert_eq!(session.execute(Operation::CreateUser).await, TaskOutcome::Succeeded);
        assert_eq!(session.state().user_ids.to_vec(), vec![4321]);

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/users");
        let body = request.body.as_ref().unwrap();
        let id = body["id"].as_u64().unwrap();
        assert!((1000..=9999).contains(&id));
        assert!(body["email"].as_str().unwrap().contains('@'));
    }

    #[tokio::test]
    async fn test_create_without_parseable_id_still_succeeds() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, r#"{"data":{"title":"no id here"}}"#);
        transport.push_json(201, "not json at all");
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);

        assert_eq!(session.execute(Operation::CreateProduct).await, TaskOutcome::Succeeded);
        assert_eq!(session.execute(Operation::CreateCart).await, TaskOutcome::Succeeded);
        assert!(session.state().product_ids.is_empty());
        assert!(session.state().cart_ids.is_empty());
        assert_eq!(reporter.totals().failures, 0);
    }

    #[tokio::test]
    async fn test_delete_product_removes_id() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(204, "");
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);
        session.state_mut().product_ids.replace_with([7]);

        assert_eq!(session.execute(Operation::DeleteProduct).await, TaskOutcome::Succeeded);
        assert!(!session.state().product_ids.contains(7));
        assert_eq!(reporter.totals().failures, 0);

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/product/7");
    }

    #[tokio::test]
    async fn test_failure_status_leaves_state_untouched() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(404, r#"{"message":"not found"}"#);
        transport.push_json(500, r#"[{"id":99}]"#);
        transport.push_json(201, r#"{"id":1}"#);
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);
        session.state_mut().product_ids.replace_with([7]);
        let before = session.state().clone();

        let outcome = session.execute(Operation::DeleteProduct).await;
        assert_eq!(
            outcome,
            TaskOutcome::Failed(FailureRecord::status(Operation::DeleteProduct, Some(7), 404))
        );

        // 列表接口失败不刷新
        session.execute(Operation::ListProducts).await;
        // 追加商品只接受 200
        session.state_mut().cart_ids.replace_with([3]);
        let outcome = session.execute(Operation::AddProductToCart).await;
        assert!(matches!(outcome, TaskOutcome::Failed(ref f) if f.label() == "add product to cart 3: HTTP 201"));

        assert_eq!(session.state().product_ids, before.product_ids);
        assert_eq!(reporter.totals().failures, 3);
        assert_eq!(reporter.failures()[0].label(), "delete product 7: HTTP 404");
        assert_eq!(reporter.failures()[1].label(), "list products: HTTP 500");
    }

    #[tokio::test]
    async fn test_transport_error_is_one_failure() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_error();
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);

        let outcome = session.execute(Operation::Login).await;
        assert!(matches!(outcome, TaskOutcome::Failed(_)));
        assert_eq!(reporter.tally(Operation::Login).failures, 1);
        assert_eq!(reporter.failures().len(), 1);
    }

    #[tokio::test]
    async fn test_cart_requests_use_known_ids() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, "{}");
        transport.push_json(200, "{}");
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);
        session.state_mut().cart_ids.replace_with([3]);
        session.state_mut().product_ids.replace_with([42]);
        session.state_mut().user_ids.replace_with([8]);

        session.execute(Operation::AddProductToCart).await;
        session.execute(Operation::UpdateCart).await;

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/carts/3/product");
        let added = &requests[0].body.as_ref().unwrap()["products"][0];
        assert_eq!(added["productId"], 42);
        assert!((1..=5).contains(&added["quantity"].as_u64().unwrap()));

        assert_eq!(requests[1].method, Method::PUT);
        assert_eq!(requests[1].path, "/carts/3");
        let update = requests[1].body.as_ref().unwrap();
        assert_eq!(update["userId"], 8);
        assert!((1..=3).contains(&update["products"][0]["quantity"].as_u64().unwrap()));
    }

    #[tokio::test]
    async fn test_gateway_profile_uses_datos_envelope() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(
            200,
            r#"{"mensaje":"ok","total_productos":2,"datos":[{"id":5},{"id":6}]}"#,
        );
        transport.push_json(201, r#"{"mensaje":"creado","datos":{"id":30}}"#);
        let reporter = TallyReporter::new();
        let mut session = session_with(&transport, &reporter, SessionProfile::gateway());

        session.on_start().await;
        session.execute(Operation::CreateProduct).await;

        assert_eq!(session.state().product_ids.to_vec(), vec![5, 6, 30]);
        assert_eq!(transport.requests()[0].path, "/products");
    }

    #[tokio::test]
    async fn test_write_requests_always_carry_body() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.set_default_response(200, "{}");
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);
        session.state_mut().product_ids.replace_with([1]);
        session.state_mut().cart_ids.replace_with([2]);
        session.state_mut().user_ids.replace_with([3]);

        for operation in Operation::ALL {
            session.execute(operation).await;
        }

        let requests = transport.requests();
        assert_eq!(requests.len(), Operation::ALL.len());
        for request in &requests {
            let writes = request.method == Method::POST || request.method == Method::PUT;
            assert_eq!(request.body.is_some(), writes, "{} {}", request.method, request.path);
        }
    }

    #[tokio::test]
    async fn test_login_sends_fixed_credentials() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, r#"{"token":"abc"}"#);
        let reporter = TallyReporter::new();
        let mut session = storefront_session(&transport, &reporter);

        assert_eq!(session.execute(Operation::Login).await, TaskOutcome::Succeeded);
        let request = &transport.requests()[0];
        assert_eq!(request.path, "/auth/login");
        assert_eq!(request.body.as_ref().unwrap()["username"], "mor_2314");
    }

    #[tokio::test]
    async fn test_tick_uses_task_weights() {
        let transport = Arc::new(ScriptedTransport::new());
        let reporter = TallyReporter::new();
        let tasks = TaskSet::new(vec![TaskDescriptor::new(Operation::ListUsers, 1)]).unwrap();
        let profile = SessionProfile::storefront().with_tasks(tasks);
        let mut session = session_with(&transport, &reporter, profile);

        for _ in 0..3 {
            transport.push_json(200, "[]");
            let (operation, outcome) = session.tick().await;
            assert_eq!(operation, Operation::ListUsers);
            assert_eq!(outcome, TaskOutcome::Succeeded);
        }
        assert_eq!(reporter.tally(Operation::ListUsers).requests, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_shutdown() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.set_default_response(200, r#"{"data":[{"id":1}]}"#);
        let reporter = TallyReporter::new();
        let tasks = TaskSet::new(vec![TaskDescriptor::new(Operation::ListProducts, 1)]).unwrap();
        let profile = SessionProfile::storefront().with_tasks(tasks);
        let session = session_with(&transport, &reporter, profile);

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(session.run(rx));

        tokio::time::sleep(Duration::from_secs(20)).await;
        tx.send(true).unwrap();
        let state = handle.await.unwrap();

        assert_eq!(state.product_ids.to_vec(), vec![1]);
        // on_start + 若干节拍，思考时间 1-5 秒，20 秒内至少 4 次
        let requests = reporter.tally(Operation::ListProducts).requests;
        assert!(requests >= 5, "requests = {requests}");
    }
}
