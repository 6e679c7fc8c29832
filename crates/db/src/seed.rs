//! Demo students inserted at startup.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set, TransactionTrait};
use tracing::{debug, info};

use crate::entities::students;

/// A student row shipped for testing and demos.
#[derive(Debug, Clone, Copy)]
pub struct SampleStudent {
    /// RFID tag.
    pub rfid_id: &'static str,
    /// Full name.
    pub name: &'static str,
    /// Class label.
    pub class_name: &'static str,
    /// Roll number.
    pub roll_number: &'static str,
}

/// The fixed set of demo students.
pub const SAMPLE_STUDENTS: [SampleStudent; 3] = [
    SampleStudent {
        rfid_id: "123456789",
        name: "John Doe",
        class_name: "10th Grade",
        roll_number: "1001",
    },
    SampleStudent {
        rfid_id: "987654321",
        name: "Jane Smith",
        class_name: "9th Grade",
        roll_number: "0901",
    },
    SampleStudent {
        rfid_id: "456789123",
        name: "Bob Johnson",
        class_name: "11th Grade",
        roll_number: "1101",
    },
];

/// Inserts [`SAMPLE_STUDENTS`], skipping tags that already exist.
///
/// Returns how many rows were inserted.
///
/// # Errors
///
/// Returns an error if a query fails; nothing is committed in that case.
pub async fn seed_sample_students(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let txn = db.begin().await?;
    let mut inserted = 0;

    for sample in &SAMPLE_STUDENTS {
        if students::Entity::find_by_id(sample.rfid_id)
            .one(&txn)
            .await?
            .is_some()
        {
            debug!(rfid_id = sample.rfid_id, "Student already exists, skipping");
            continue;
        }

        let student = students::ActiveModel {
            rfid_id: Set(sample.rfid_id.to_string()),
            student_name: Set(sample.name.to_string()),
            class_name: Set(Some(sample.class_name.to_string())),
            roll_number: Set(Some(sample.roll_number.to_string())),
        };
        students::Entity::insert(student)
            .exec_without_returning(&txn)
            .await?;
        inserted += 1;
    }

    txn.commit().await?;
    info!(inserted, "Sample students seeded");
    Ok(inserted)
}
