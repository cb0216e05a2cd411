//! Gig lifecycle tests: create, edit images, delete, completion stats

use std::time::Duration;

use freehub_api::mock::{MockFailure, MockOperation};
use freehub_common::{Error, ScreenScope};
use freehub_domain::GigStatus;
use freehub_gigs::{AttachmentList, GigForm};

use crate::common::{files, TestApp};

fn form(title: &str) -> GigForm {
    GigForm::new(title, "Hand-drawn, three revisions", "75.00", "design")
}

fn attachments(count: usize) -> AttachmentList {
    let mut list = AttachmentList::new();
    list.add_files(files(count));
    list
}

mod test_create {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_image_count_matches_attachment_count() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();

        for count in [0, 1, 4] {
            let gig = t
                .app
                .gigs
                .create(form(&format!("Logo {count}")), &attachments(count))
                .await
                .unwrap();
            assert_eq!(gig.images.len(), count);
        }
        assert_eq!(t.api.gigs().len(), 3);
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_field_makes_no_transport_call() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();
        t.api.reset();

        let cases = [
            GigForm::new("", "d", "10", "c"),
            GigForm::new("t", "", "10", "c"),
            GigForm::new("t", "d", "", "c"),
            GigForm::new("t", "d", "10", ""),
        ];
        for case in cases {
            let err = t
                .app
                .gigs
                .create(case.clone(), &attachments(1))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{case:?}");

            let err = t
                .app
                .gigs
                .update("gig-1", case, &AttachmentList::new())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(t.api.recorded_calls().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_client_role_cannot_publish() {
        let t = TestApp::new().unwrap();
        t.login_client().await.unwrap();
        t.api.reset();

        let err = t
            .app
            .gigs
            .create(form("Nope"), &AttachmentList::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));
        assert!(t.api.recorded_calls().is_empty());
    }
}

mod test_update_images {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_keeping_every_image_leaves_set_unchanged() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();
        let gig = t.app.gigs.create(form("Banner"), &attachments(3)).await.unwrap();

        let edit = AttachmentList::from_remote(gig.images.clone());
        let updated = t
            .app
            .gigs
            .update(&gig.id, GigForm::from_gig(&gig), &edit)
            .await
            .unwrap();
        assert_eq!(updated.images, gig.images);
    }

    #[test_log::test(tokio::test)]
    async fn test_removing_position_i_drops_exactly_that_reference() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();

        for (count, index) in [(1, 0), (3, 0), (3, 1), (3, 2), (5, 3)] {
            let gig = t
                .app
                .gigs
                .create(form("Poster"), &attachments(count))
                .await
                .unwrap();

            let mut edit = AttachmentList::from_remote(gig.images.clone());
            edit.remove(index);
            let updated = t
                .app
                .gigs
                .update(&gig.id, GigForm::from_gig(&gig), &edit)
                .await
                .unwrap();

            let mut expected = gig.images.clone();
            let dropped = expected.remove(index);
            assert_eq!(updated.images, expected);
            assert!(!updated.images.contains(&dropped));
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_new_files_append_after_kept_images() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();
        let gig = t.app.gigs.create(form("Flyer"), &attachments(2)).await.unwrap();

        let mut edit = AttachmentList::from_remote(gig.images.clone());
        edit.remove(0);
        edit.add_files(files(2));
        let updated = t
            .app
            .gigs
            .update(&gig.id, GigForm::from_gig(&gig), &edit)
            .await
            .unwrap();

        assert_eq!(updated.images.len(), 3);
        assert_eq!(updated.images[0], gig.images[1]);
    }

    #[test_log::test(tokio::test)]
    async fn test_explicit_replacement_drops_remote_images() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();
        let gig = t.app.gigs.create(form("Card"), &attachments(3)).await.unwrap();

        let mut edit = AttachmentList::from_remote(gig.images.clone());
        edit.add_files(files(1));
        let updated = t
            .app
            .gigs
            .update_with_plan(&gig.id, GigForm::from_gig(&gig), edit.replacement_plan())
            .await
            .unwrap();

        assert_eq!(updated.images.len(), 1);
        assert!(gig.images.iter().all(|old| !updated.images.contains(old)));
    }

    #[test_log::test(tokio::test)]
    async fn test_update_of_deleted_gig_is_conflict() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();
        let gig = t.app.gigs.create(form("Gone"), &attachments(0)).await.unwrap();
        t.app.gigs.remove(&gig.id).await.unwrap();

        let err = t
            .app
            .gigs
            .update(&gig.id, GigForm::from_gig(&gig), &AttachmentList::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(t.api.calls_for(MockOperation::UpdateGig).len(), 1);
    }
}

mod test_reads {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_fetch_one_failures_send_user_to_safe_routes() {
        let t = TestApp::new().unwrap();
        let err = t.app.gigs.fetch_one("gig-9").await.unwrap_err();
        assert_eq!(err.fallback_route(), Some("/login"));

        t.login_freelancer().await.unwrap();
        let err = t.app.gigs.fetch_one("gig-9").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.fallback_route(), Some("/dashboard"));
    }

    #[test_log::test(tokio::test)]
    async fn test_expired_token_maps_to_login() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();
        t.api.fail_on(
            MockOperation::ListGigs,
            None,
            MockFailure::status(401, "Token is not valid"),
        );

        let err = t.app.gigs.list().await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert_eq!(err.user_message(), "Token is not valid");
        assert_eq!(err.fallback_route(), Some("/login"));
    }

    #[test_log::test(tokio::test)]
    async fn test_response_after_teardown_is_discarded() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();
        t.seed_gig("gig-slow", "Slow gig", 10);
        t.api.set_delay(Duration::from_millis(50));

        let scope = ScreenScope::new();
        let navigate_away = {
            let scope = scope.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                scope.teardown();
            }
        };

        let (result, ()) = tokio::join!(scope.apply(t.app.gigs.fetch_one("gig-slow")), navigate_away);
        assert!(result.is_none());
        // The request itself still went out
        assert_eq!(t.api.calls_for(MockOperation::GetGig).len(), 1);
    }
}

mod test_delete {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_delete_evicts_and_tolerates_already_deleted() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();
        let gig = t.app.gigs.create(form("Temp"), &attachments(0)).await.unwrap();
        t.app.gigs.list().await.unwrap();

        t.app.gigs.remove(&gig.id).await.unwrap();
        assert!(t.app.gigs.cached().is_empty());

        t.app.gigs.remove(&gig.id).await.unwrap();
        assert_eq!(t.api.calls_for(MockOperation::DeleteGig).len(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn test_failed_delete_is_not_retried() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();
        let gig = t.app.gigs.create(form("Stays"), &attachments(0)).await.unwrap();
        t.api
            .fail_on(MockOperation::DeleteGig, Some(&gig.id), MockFailure::Network);

        let err = t.app.gigs.remove(&gig.id).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        assert_eq!(t.api.calls_for(MockOperation::DeleteGig).len(), 1);
        assert_eq!(t.app.gigs.cached().len(), 1);
    }
}

mod test_stats {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_success_rate_empty_and_quarter() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();

        t.app.gigs.list().await.unwrap();
        assert_eq!(t.app.gigs.stats().success_rate, 0);

        for id in ["a", "b", "c", "d"] {
            t.seed_gig(id, id, 5);
        }
        t.app.gigs.list().await.unwrap();
        t.app.gigs.mark_complete("c").unwrap();

        let stats = t.app.gigs.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.success_rate, 25);
    }

    #[test_log::test(tokio::test)]
    async fn test_local_completion_survives_restart_until_confirmed() {
        let t = TestApp::new().unwrap();
        t.login_freelancer().await.unwrap();
        t.seed_gig("a", "A", 5);
        t.seed_gig("b", "B", 5);
        t.app.gigs.list().await.unwrap();
        t.app.gigs.mark_complete("a").unwrap();

        let reopened = t.reopen().unwrap();
        reopened.gigs.list().await.unwrap();
        assert_eq!(reopened.gigs.stats().completed, 1);

        t.api.set_status("a", GigStatus::Completed);
        reopened.gigs.list().await.unwrap();
        assert_eq!(reopened.gigs.stats().completed, 1);

        // Confirmed by the server, so a reopen that sees it reverted does not resurrect it
        t.api.set_status("a", GigStatus::Active);
        let again = t.reopen().unwrap();
        again.gigs.list().await.unwrap();
        assert_eq!(again.gigs.stats().completed, 0);
    }
}
