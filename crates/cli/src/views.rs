//! Per-view snapshot state.
//!
//! Each view owns a private copy of what it last fetched plus one
//! user-facing error line. A mutating operation waits for its response and
//! then refetches the whole list; the snapshot is replaced only on success,
//! so a failed operation leaves the previous data in place. Nothing is
//! retried and nothing panics: failures are scoped to the action that
//! triggered them.

use api_types::{
    Amount,
    balance::Balance,
    group::{Group, GroupNew, GroupUpdate, MemberAdd},
    instance::{Instance, InstanceNew, InstanceUpdate},
    item::{Item, ItemNew, ItemUpdate},
};
use chrono::NaiveDate;
use client::{ApiClient, BalanceSplit, TokenProvider, split_balances};

#[derive(Debug, Default)]
pub struct GroupsView {
    pub groups: Vec<Group>,
    pub error: Option<String>,
}

impl GroupsView {
    pub async fn refresh<P: TokenProvider>(&mut self, api: &ApiClient<P>) {
        match api.groups().await {
            Ok(groups) => {
                self.groups = groups;
                self.error = None;
            }
            Err(err) => {
                tracing::error!("group list fetch failed: {err}");
                self.error = Some("Failed to fetch groups".to_string());
            }
        }
    }

    pub async fn create<P: TokenProvider>(
        &mut self,
        api: &ApiClient<P>,
        name: &str,
        description: &str,
    ) {
        if name.trim().is_empty() {
            self.error = Some("Group name cannot be empty".to_string());
            return;
        }

        let payload = GroupNew {
            name: name.to_string(),
            description: description.to_string(),
        };
        match api.create_group(&payload).await {
            Ok(_) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("group create failed: {err}");
                self.error = Some("Failed to create group".to_string());
            }
        }
    }

    pub async fn update<P: TokenProvider>(
        &mut self,
        api: &ApiClient<P>,
        id: i64,
        name: &str,
        description: &str,
    ) {
        if name.trim().is_empty() {
            self.error = Some("Group name cannot be empty".to_string());
            return;
        }

        let payload = GroupUpdate {
            name: name.to_string(),
            description: description.to_string(),
        };
        match api.update_group(id, &payload).await {
            Ok(_) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("group update failed: {err}");
                self.error = Some("Failed to update group".to_string());
            }
        }
    }

    pub async fn remove<P: TokenProvider>(&mut self, api: &ApiClient<P>, id: i64) {
        match api.delete_group(id).await {
            Ok(()) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("group delete failed: {err}");
                self.error = Some("Failed to delete group".to_string());
            }
        }
    }

    pub async fn leave<P: TokenProvider>(&mut self, api: &ApiClient<P>, id: i64) {
        match api.leave_group(id).await {
            Ok(()) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("group leave failed: {err}");
                self.error = Some("Failed to leave group".to_string());
            }
        }
    }

    pub async fn invite<P: TokenProvider>(&mut self, api: &ApiClient<P>, id: i64, email: &str) {
        if email.trim().is_empty() {
            self.error = Some("Enter a valid email".to_string());
            return;
        }

        let payload = MemberAdd {
            email: email.to_string(),
        };
        match api.add_member(id, &payload).await {
            Ok(()) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("member invite failed: {err}");
                self.error = Some("Failed to invite member".to_string());
            }
        }
    }
}

/// Instances view also keeps the caller's groups: creating an instance
/// needs a group to attach it to.
#[derive(Debug, Default)]
pub struct InstancesView {
    pub instances: Vec<Instance>,
    pub groups: Vec<Group>,
    pub error: Option<String>,
}

impl InstancesView {
    pub async fn refresh<P: TokenProvider>(&mut self, api: &ApiClient<P>) {
        let (instances, groups) = tokio::join!(api.instances(), api.groups());
        match (instances, groups) {
            (Ok(instances), Ok(groups)) => {
                self.instances = instances;
                self.groups = groups;
                self.error = None;
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::error!("instance list fetch failed: {err}");
                self.error = Some("Failed to fetch instances".to_string());
            }
        }
    }

    pub async fn create<P: TokenProvider>(
        &mut self,
        api: &ApiClient<P>,
        name: &str,
        date: NaiveDate,
        description: &str,
        group: i64,
    ) {
        if name.trim().is_empty() {
            self.error = Some("Trip name cannot be empty".to_string());
            return;
        }

        let payload = InstanceNew {
            name: name.to_string(),
            date,
            description: description.to_string(),
            group,
        };
        match api.create_instance(&payload).await {
            Ok(_) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("instance create failed: {err}");
                self.error = Some("Failed to create instance".to_string());
            }
        }
    }

    pub async fn update<P: TokenProvider>(
        &mut self,
        api: &ApiClient<P>,
        id: i64,
        name: &str,
        date: NaiveDate,
        description: &str,
        group: i64,
    ) {
        if name.trim().is_empty() {
            self.error = Some("Trip name cannot be empty".to_string());
            return;
        }

        let payload = InstanceUpdate {
            name: name.to_string(),
            date,
            description: description.to_string(),
            group,
        };
        match api.update_instance(id, &payload).await {
            Ok(_) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("instance update failed: {err}");
                self.error = Some("Failed to update instance".to_string());
            }
        }
    }

    pub async fn remove<P: TokenProvider>(&mut self, api: &ApiClient<P>, id: i64) {
        match api.delete_instance(id).await {
            Ok(()) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("instance delete failed: {err}");
                self.error = Some("Failed to delete instance".to_string());
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ItemsView {
    pub items: Vec<Item>,
    pub error: Option<String>,
}

impl ItemsView {
    pub async fn refresh<P: TokenProvider>(&mut self, api: &ApiClient<P>) {
        match api.items().await {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(err) => {
                tracing::error!("item list fetch failed: {err}");
                self.error = Some("Failed to fetch items".to_string());
            }
        }
    }

    pub async fn create<P: TokenProvider>(
        &mut self,
        api: &ApiClient<P>,
        name: &str,
        price: Amount,
        instance: i64,
        shared_with: Vec<i64>,
    ) {
        if name.trim().is_empty() {
            self.error = Some("Item name cannot be empty".to_string());
            return;
        }
        if shared_with.is_empty() {
            self.error = Some("Share the item with at least one member".to_string());
            return;
        }

        let payload = ItemNew {
            name: name.to_string(),
            price,
            instance,
            shared_with,
        };
        match api.create_item(&payload).await {
            Ok(_) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("item create failed: {err}");
                self.error = Some("Failed to create item".to_string());
            }
        }
    }

    pub async fn update<P: TokenProvider>(
        &mut self,
        api: &ApiClient<P>,
        id: i64,
        name: &str,
        price: Amount,
        instance: i64,
        shared_with: Vec<i64>,
    ) {
        if name.trim().is_empty() {
            self.error = Some("Item name cannot be empty".to_string());
            return;
        }
        if shared_with.is_empty() {
            self.error = Some("Share the item with at least one member".to_string());
            return;
        }

        let payload = ItemUpdate {
            name: name.to_string(),
            price,
            instance,
            shared_with,
        };
        match api.update_item(id, &payload).await {
            Ok(_) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("item update failed: {err}");
                self.error = Some("Failed to update item".to_string());
            }
        }
    }

    pub async fn remove<P: TokenProvider>(&mut self, api: &ApiClient<P>, id: i64) {
        match api.delete_item(id).await {
            Ok(()) => self.refresh(api).await,
            Err(err) => {
                tracing::error!("item delete failed: {err}");
                self.error = Some("Failed to delete item".to_string());
            }
        }
    }
}

/// Balances, already partitioned from the caller's point of view.
#[derive(Debug, Default)]
pub struct BalancesView {
    pub i_owe: Vec<Balance>,
    pub owed_to_me: Vec<Balance>,
    pub error: Option<String>,
}

impl BalancesView {
    pub async fn refresh<P: TokenProvider>(&mut self, api: &ApiClient<P>, caller_email: &str) {
        match api.balances().await {
            Ok(balances) => {
                let BalanceSplit { i_owe, owed_to_me } = split_balances(balances, caller_email);
                self.i_owe = i_owe;
                self.owed_to_me = owed_to_me;
                self.error = None;
            }
            Err(err) => {
                tracing::error!("balance fetch failed: {err}");
                self.error = Some("Failed to fetch balances".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use client::FixedTokens;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    fn user_json(id: i64, email: &str) -> serde_json::Value {
        json!({
            "id": id,
            "username": email,
            "email": email,
            "first_name": "",
            "last_name": "",
        })
    }

    fn group_json(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": "",
            "created_by": user_json(1, "a@example.com"),
            "created_at": "2025-06-01T12:00:00Z",
            "members": [],
        })
    }

    fn instance_json(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "date": "2025-06-01",
            "description": "",
            "group": 1,
            "created_by": user_json(1, "a@example.com"),
            "created_at": "2025-06-01T12:00:00Z",
            "items": [],
        })
    }

    fn api_for(server: &MockServer) -> ApiClient<FixedTokens> {
        ApiClient::new(server.uri(), FixedTokens::bearer("tok"))
    }

    #[tokio::test]
    async fn empty_group_name_is_rejected_before_dispatch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/groups/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut view = GroupsView::default();
        view.create(&api_for(&server), "   ", "weekly shop").await;

        assert_eq!(view.error.as_deref(), Some("Group name cannot be empty"));
        assert!(view.groups.is_empty());
    }

    #[tokio::test]
    async fn empty_invite_email_is_rejected_before_dispatch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/groups/1/add_member/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut view = GroupsView::default();
        view.invite(&api_for(&server), 1, "  ").await;

        assert_eq!(view.error.as_deref(), Some("Enter a valid email"));
    }

    #[tokio::test]
    async fn empty_share_list_is_rejected_before_dispatch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/items/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut view = ItemsView::default();
        view.create(&api_for(&server), "Milk", Amount::from_cents(199), 1, vec![])
            .await;

        assert_eq!(
            view.error.as_deref(),
            Some("Share the item with at least one member")
        );
    }

    #[tokio::test]
    async fn delete_instance_refetches_and_drops_the_row() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/instances/2/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/instances/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([instance_json(1, "Groceries")])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/groups/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([group_json(1, "Flat")])))
            .expect(1)
            .mount(&server)
            .await;

        let mut view = InstancesView::default();
        view.remove(&api_for(&server), 2).await;

        assert!(view.error.is_none());
        let ids: Vec<i64> = view.instances.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_the_previous_snapshot() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/groups/"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
            .mount(&server)
            .await;

        let mut view = GroupsView::default();
        view.groups = vec![serde_json::from_value(group_json(1, "Flat")).unwrap()];
        view.refresh(&api_for(&server)).await;

        assert_eq!(view.error.as_deref(), Some("Failed to fetch groups"));
        assert_eq!(view.groups.len(), 1);
    }

    #[tokio::test]
    async fn balances_view_partitions_for_the_caller() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/balances/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 1,
                    "from_user": user_json(1, "a@example.com"),
                    "to_user": user_json(2, "b@example.com"),
                    "amount": "10.00",
                },
                {
                    "id": 2,
                    "from_user": user_json(2, "b@example.com"),
                    "to_user": user_json(1, "a@example.com"),
                    "amount": 5,
                },
            ])))
            .mount(&server)
            .await;

        let mut view = BalancesView::default();
        view.refresh(&api_for(&server), "a@example.com").await;

        assert!(view.error.is_none());
        assert_eq!(view.i_owe.len(), 1);
        assert_eq!(view.i_owe[0].amount, Amount::from_cents(1000));
        assert_eq!(view.owed_to_me.len(), 1);
        assert_eq!(view.owed_to_me[0].amount, Amount::from_cents(500));
    }
}
