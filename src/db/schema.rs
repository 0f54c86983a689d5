//! Diesel schema for workflow persistence.

diesel::table! {
    /// Documentation tasks with their writer assignments.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Function under documentation.
        #[max_length = 512]
        function_ref -> Varchar,
        /// Human-readable title.
        #[max_length = 255]
        title -> Varchar,
        /// Longer description.
        description -> Text,
        /// Code annotator assignment.
        annotator -> Uuid,
        /// First writer slot.
        writer1 -> Uuid,
        /// Second writer slot.
        writer2 -> Uuid,
        /// Admin who created the task.
        assigned_by -> Uuid,
        /// Optional submission deadline.
        deadline -> Nullable<Timestamptz>,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Linked voting session, if any.
        voting_session -> Nullable<Uuid>,
        /// Assignment round counter.
        round -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail of writer reassignments.
    reassignment_records (id) {
        /// Record identifier.
        id -> Uuid,
        /// Reassigned task.
        task_id -> Uuid,
        /// Round the reassignment opened.
        round -> Int4,
        /// Outgoing first writer.
        previous_writer1 -> Uuid,
        /// Outgoing second writer.
        previous_writer2 -> Uuid,
        /// Incoming first writer.
        new_writer1 -> Uuid,
        /// Incoming second writer.
        new_writer2 -> Uuid,
        /// Deadline of the closed round, if any.
        previous_deadline -> Nullable<Timestamptz>,
        /// Deadline of the new round.
        new_deadline -> Timestamptz,
        /// Admin who ordered the reassignment.
        reassigned_by -> Uuid,
        /// Optional free-text reason.
        reason -> Nullable<Text>,
        /// When the reassignment was recorded.
        recorded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Writer drafts, one live draft per (task, writer).
    draft_documents (id) {
        /// Document identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Assignment round.
        round -> Int4,
        /// Authoring writer.
        author -> Uuid,
        /// Document title.
        #[max_length = 255]
        title -> Varchar,
        /// Body payload, wiki or entry shaped.
        body -> Jsonb,
        /// Draft status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last edit timestamp.
        updated_at -> Timestamptz,
        /// Submission timestamp, if submitted.
        submitted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Ordered API test configs owned by one document.
    api_test_configs (id) {
        /// Config identifier.
        id -> Uuid,
        /// Owning document.
        document_id -> Uuid,
        /// Explicit ordering index.
        position -> Int4,
        /// Test name.
        #[max_length = 255]
        name -> Varchar,
        /// HTTP method.
        #[max_length = 16]
        method -> Varchar,
        /// Endpoint path.
        #[max_length = 512]
        endpoint -> Varchar,
        /// Expected response status, if configured.
        expected_status -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Ordered use-case scripts owned by one document.
    use_case_scripts (id) {
        /// Script identifier.
        id -> Uuid,
        /// Owning document.
        document_id -> Uuid,
        /// Explicit ordering index.
        position -> Int4,
        /// Script title.
        #[max_length = 255]
        title -> Varchar,
        /// Script body.
        script -> Text,
    }
}

diesel::table! {
    /// Latest quality-gate run per document, one row per check.
    quality_check_results (id) {
        /// Row identifier.
        id -> Uuid,
        /// Checked document.
        document_id -> Uuid,
        /// Position of the check within the run.
        position -> Int4,
        /// Check name.
        #[max_length = 100]
        check_name -> Varchar,
        /// Severity tag.
        #[max_length = 20]
        verdict -> Varchar,
        /// 0-100 check score.
        score -> Int4,
        /// Human-readable detail.
        detail -> Text,
        /// Aggregate score of the run, denormalised onto each row.
        aggregate_score -> Int4,
        /// Whether the run permitted submission.
        can_submit -> Bool,
    }
}

diesel::table! {
    /// Binary per-task ballots, unique per (task, voter).
    binary_votes (id) {
        /// Ballot identifier.
        id -> Uuid,
        /// Voted task.
        task_id -> Uuid,
        /// Voter.
        voter -> Uuid,
        /// Chosen option.
        #[max_length = 50]
        choice -> Varchar,
        /// Optional free-text comment.
        comment -> Nullable<Text>,
        /// When the ballot was cast.
        cast_at -> Timestamptz,
    }
}

diesel::table! {
    /// Voting sessions wrapping one task's submitted drafts.
    voting_sessions (id) {
        /// Session identifier.
        id -> Uuid,
        /// Wrapped task.
        task_id -> Uuid,
        /// Assignment round voted on.
        round -> Int4,
        /// Session title.
        #[max_length = 255]
        title -> Varchar,
        /// Session status.
        #[max_length = 50]
        status -> Varchar,
        /// Admin who opened the session.
        opened_by -> Uuid,
        /// When the session was opened.
        opened_at -> Timestamptz,
        /// When the session was closed, if it was.
        closed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Candidates registered within a session.
    session_candidates (id) {
        /// Candidate identifier.
        id -> Uuid,
        /// Owning session.
        session_id -> Uuid,
        /// Underlying draft document.
        document_id -> Uuid,
        /// Denormalised draft author.
        author -> Uuid,
        /// Registration order.
        position -> Int4,
        /// Final vote count, written at closure.
        vote_count -> Int4,
        /// Winner flag, written at closure.
        is_winner -> Bool,
    }
}

diesel::table! {
    /// Session ballots, unique per (session, voter).
    session_votes (id) {
        /// Ballot identifier.
        id -> Uuid,
        /// Voted session.
        session_id -> Uuid,
        /// Voter.
        voter -> Uuid,
        /// Discriminant: `candidate` or `none_satisfied`.
        #[max_length = 50]
        choice -> Varchar,
        /// Chosen candidate when the choice is `candidate`.
        candidate_id -> Nullable<Uuid>,
        /// When the ballot was cast.
        cast_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    tasks,
    reassignment_records,
    draft_documents,
    api_test_configs,
    use_case_scripts,
    quality_check_results,
    binary_votes,
    voting_sessions,
    session_candidates,
    session_votes,
);
