//! Demo catalog: one package with two questions per category and a few
//! study materials. Re-running it overwrites the same ids.

use serde::Serialize;

use storage::repository::{MaterialRepository, PackageRepository, QuestionRepository, Storage};
use tryout_core::model::{
    AnswerKey, Category, MaterialId, OptionLetter, OptionWeights, Package, PackageId, Question,
    QuestionId, StudyMaterial,
};

pub const DEMO_PACKAGE: PackageId = PackageId::new(1);

#[derive(Debug, Serialize)]
pub struct SeedReport {
    pub package: PackageId,
    pub questions: usize,
    pub materials: usize,
}

fn options(a: &str, b: &str, c: &str, d: &str, e: &str) -> [String; 5] {
    [a, b, c, d, e].map(String::from)
}

fn objective(
    id: u32,
    category: Category,
    topic: &str,
    text: &str,
    opts: [String; 5],
    correct: OptionLetter,
) -> anyhow::Result<Question> {
    Ok(Question::new(
        QuestionId::new(u64::from(id)),
        DEMO_PACKAGE,
        id,
        category,
        topic,
        text,
        opts,
        AnswerKey::Correct { option: correct },
    )?)
}

fn behavioral(
    id: u32,
    topic: &str,
    text: &str,
    opts: [String; 5],
    weights: [f64; 5],
) -> anyhow::Result<Question> {
    Ok(Question::new(
        QuestionId::new(u64::from(id)),
        DEMO_PACKAGE,
        id,
        Category::Tkp,
        topic,
        text,
        opts,
        AnswerKey::Weighted {
            weights: OptionWeights::new(weights)?,
        },
    )?)
}

fn demo_questions() -> anyhow::Result<Vec<Question>> {
    Ok(vec![
        objective(
            1,
            Category::Twk,
            "Pancasila",
            "Sila keempat Pancasila dilambangkan dengan",
            options("Kepala banteng", "Bintang", "Rantai", "Pohon beringin", "Padi dan kapas"),
            OptionLetter::A,
        )?,
        objective(
            2,
            Category::Twk,
            "Nasionalisme",
            "Sumpah Pemuda diikrarkan pada tahun",
            options("1908", "1945", "1928", "1926", "1930"),
            OptionLetter::C,
        )?,
        objective(
            3,
            Category::Tiu,
            "Numerik",
            "2, 6, 18, 54, ...",
            options("108", "162", "148", "216", "120"),
            OptionLetter::B,
        )?,
        objective(
            4,
            Category::Tiu,
            "Verbal",
            "Antonim dari kata 'statis'",
            options("Tetap", "Diam", "Kaku", "Dinamis", "Stabil"),
            OptionLetter::D,
        )?,
        behavioral(
            5,
            "Pelayanan Publik",
            "Warga datang mengeluh saat jam layanan hampir berakhir. Sikap anda",
            options(
                "Meminta datang besok",
                "Mengarahkan ke petugas lain",
                "Mendengarkan lalu mencatat",
                "Melayani hingga tuntas",
                "Melayani dan menindaklanjuti keluhan",
            ),
            [1.0, 2.0, 3.0, 4.0, 5.0],
        )?,
        behavioral(
            6,
            "Integritas",
            "Rekan kerja menawarkan hadiah agar berkasnya didahulukan. Sikap anda",
            options(
                "Menolak dan melaporkan",
                "Menolak dengan sopan",
                "Menunda jawaban",
                "Menerima tanpa mendahulukan",
                "Menerima dan mendahulukan",
            ),
            [5.0, 4.0, 3.0, 2.0, 1.0],
        )?,
    ])
}

fn demo_materials() -> Vec<StudyMaterial> {
    vec![
        StudyMaterial::new(
            MaterialId::new(1),
            "Modul Pancasila",
            "Lambang, butir pengamalan dan sejarah perumusan",
        ),
        StudyMaterial::new(
            MaterialId::new(2),
            "Latihan Numerik",
            "Deret angka, perbandingan dan aritmetika sosial",
        ),
        StudyMaterial::new(
            MaterialId::new(3),
            "Etika Pelayanan Publik",
            "Studi kasus sikap kerja dan integritas aparatur",
        ),
    ]
}

/// # Errors
///
/// Fails when the catalog cannot be written.
pub async fn seed_demo(storage: &Storage) -> anyhow::Result<SeedReport> {
    let package = Package::new(DEMO_PACKAGE, "Tryout SKD 1", 100)?;
    storage.packages.upsert_package(&package).await?;

    let questions = demo_questions()?;
    for question in &questions {
        storage.questions.upsert_question(question).await?;
    }
    let materials = demo_materials();
    for material in &materials {
        storage.materials.upsert_material(material).await?;
    }

    tracing::info!(
        package = %DEMO_PACKAGE,
        questions = questions.len(),
        "demo catalog seeded"
    );
    Ok(SeedReport {
        package: DEMO_PACKAGE,
        questions: questions.len(),
        materials: materials.len(),
    })
}
