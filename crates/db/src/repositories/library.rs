//! Library repository for student, book and loan database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbBackend, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::Expr,
};
use tracing::{debug, info};

use libris_core::library::{
    BookMatch, IssuedLoan, LibraryError, LibraryStore, LoanRecord, LoanScope, NewLoan, Student,
};

use crate::entities::{books, students, transactions};

/// Error types for loan repository operations.
#[derive(Debug, thiserror::Error)]
pub enum LoanRepositoryError {
    /// No student carries this tag.
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LoanRepositoryError> for LibraryError {
    fn from(err: LoanRepositoryError) -> Self {
        match err {
            LoanRepositoryError::StudentNotFound(tag_id) => Self::StudentNotFound(tag_id),
            LoanRepositoryError::Database(e) => Self::Storage(e.to_string()),
        }
    }
}

/// Row shape of the loan listing join.
#[derive(Debug, FromQueryResult)]
struct LoanRow {
    id: i32,
    rfid_id: String,
    student_name: String,
    class_name: Option<String>,
    book_id: i32,
    book_name: String,
    issue_date: DateTime<Utc>,
    return_date: DateTime<Utc>,
    returned: bool,
}

impl From<LoanRow> for LoanRecord {
    fn from(row: LoanRow) -> Self {
        Self {
            id: row.id,
            tag_id: row.rfid_id,
            student_name: row.student_name,
            class_name: row.class_name,
            book_id: row.book_id,
            book_title: row.book_name,
            issued_at: row.issue_date,
            return_at: row.return_date,
            returned: row.returned,
        }
    }
}

/// Library repository backed by a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct LibraryRepository {
    db: DatabaseConnection,
}

impl LibraryRepository {
    /// Creates a new library repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a student by RFID tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_student_by_tag(
        &self,
        tag_id: &str,
    ) -> Result<Option<students::Model>, LoanRepositoryError> {
        Ok(students::Entity::find_by_id(tag_id).one(&self.db).await?)
    }

    /// Records a loan in a single database transaction.
    ///
    /// Takes the write lock, checks the student, reuses or creates the book,
    /// then inserts the loan row. Any failure rolls the whole unit back.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No student carries the loan's tag
    /// - Database operation fails
    pub async fn insert_loan(&self, loan: &NewLoan) -> Result<IssuedLoan, LoanRepositoryError> {
        let txn = self.db.begin().await?;

        if !lock_for_issue(&txn, &loan.tag_id).await? {
            txn.rollback().await?;
            return Err(LoanRepositoryError::StudentNotFound(loan.tag_id.clone()));
        }

        let (book_id, book_created) = match find_book(&txn, loan).await? {
            Some(book) => (book.id, false),
            None => {
                let book = books::ActiveModel {
                    book_name: Set(loan.title.clone()),
                    author: Set(loan.author.clone()),
                    isbn: Set(loan.isbn.clone()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                debug!(book_id = book.id, title = %book.book_name, "Book created");
                (book.id, true)
            }
        };

        let transaction = transactions::ActiveModel {
            rfid_id: Set(loan.tag_id.clone()),
            book_id: Set(book_id),
            issue_date: Set(loan.issued_at),
            return_date: Set(loan.due_at),
            returned: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            transaction_id = transaction.id,
            rfid_id = %loan.tag_id,
            book_id,
            book_created,
            "Loan recorded"
        );

        Ok(IssuedLoan {
            transaction_id: transaction.id,
            book_id,
            book_created,
        })
    }

    /// Flags a loan returned and stamps the actual return time.
    ///
    /// Returns `false` when no row has this ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn set_returned(
        &self,
        transaction_id: i32,
        returned_at: DateTime<Utc>,
    ) -> Result<bool, LoanRepositoryError> {
        let result = transactions::Entity::update_many()
            .col_expr(transactions::Column::Returned, Expr::value(true))
            .col_expr(transactions::Column::ReturnDate, Expr::value(returned_at))
            .filter(transactions::Column::Id.eq(transaction_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Lists loans joined with student and book.
    ///
    /// Ordered by issue date descending, then ID descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_loans(
        &self,
        scope: LoanScope,
    ) -> Result<Vec<LoanRecord>, LoanRepositoryError> {
        let mut query = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Id)
            .column(transactions::Column::RfidId)
            .column_as(students::Column::StudentName, "student_name")
            .column_as(students::Column::ClassName, "class_name")
            .column(transactions::Column::BookId)
            .column_as(books::Column::BookName, "book_name")
            .column(transactions::Column::IssueDate)
            .column(transactions::Column::ReturnDate)
            .column(transactions::Column::Returned)
            .join(JoinType::InnerJoin, transactions::Relation::Students.def())
            .join(JoinType::InnerJoin, transactions::Relation::Books.def());

        if scope == LoanScope::Active {
            query = query.filter(transactions::Column::Returned.eq(false));
        }

        let rows = query
            .order_by_desc(transactions::Column::IssueDate)
            .order_by_desc(transactions::Column::Id)
            .into_model::<LoanRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(LoanRecord::from).collect())
    }
}

/// Serializes issue transactions and checks the student exists.
///
/// The first statement is a write, so SQLite takes its write lock up front
/// and waits out competing writers instead of failing a read-to-write
/// upgrade. PostgreSQL additionally locks `books` against concurrent
/// lookup-or-create until commit. Returns `false` when the tag is unknown.
async fn lock_for_issue(txn: &DatabaseTransaction, tag_id: &str) -> Result<bool, DbErr> {
    if txn.get_database_backend() == DbBackend::Postgres {
        txn.execute_unprepared("LOCK TABLE books IN SHARE ROW EXCLUSIVE MODE")
            .await?;
    }

    let touched = students::Entity::update_many()
        .col_expr(
            students::Column::RfidId,
            Expr::col(students::Column::RfidId).into(),
        )
        .filter(students::Column::RfidId.eq(tag_id))
        .exec(txn)
        .await?;

    Ok(touched.rows_affected > 0)
}

/// Finds the oldest book matching the loan's lookup rule.
///
/// Without an author, rows stored with a NULL or empty author both match.
async fn find_book<C: ConnectionTrait>(
    conn: &C,
    loan: &NewLoan,
) -> Result<Option<books::Model>, DbErr> {
    let mut query = books::Entity::find().filter(books::Column::BookName.eq(loan.title.as_str()));

    if loan.book_match == BookMatch::TitleAndAuthor {
        query = match loan.author.as_deref() {
            Some(author) => query.filter(books::Column::Author.eq(author)),
            None => query.filter(
                Condition::any()
                    .add(books::Column::Author.is_null())
                    .add(books::Column::Author.eq("")),
            ),
        };
    }

    query.order_by_asc(books::Column::Id).one(conn).await
}

#[async_trait]
impl LibraryStore for LibraryRepository {
    async fn find_student(&self, tag_id: &str) -> Result<Option<Student>, LibraryError> {
        Ok(self.find_student_by_tag(tag_id).await?.map(Student::from))
    }

    async fn record_issue(&self, loan: &NewLoan) -> Result<IssuedLoan, LibraryError> {
        Ok(self.insert_loan(loan).await?)
    }

    async fn mark_returned(
        &self,
        transaction_id: i32,
        returned_at: DateTime<Utc>,
    ) -> Result<bool, LibraryError> {
        Ok(self.set_returned(transaction_id, returned_at).await?)
    }

    async fn loans(&self, scope: LoanScope) -> Result<Vec<LoanRecord>, LibraryError> {
        Ok(self.list_loans(scope).await?)
    }
}
