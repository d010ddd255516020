//! CSV fixtures shaped like the three preset datasets

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(header: &str, rows: impl IntoIterator<Item = String>) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    writeln!(file, "{}", header).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

/// 150 rows, 50 per species, with an `Id` column
pub fn iris_csv() -> NamedTempFile {
    let species = ["Iris-setosa", "Iris-versicolor", "Iris-virginica"];
    let rows = (0..150).map(|i| {
        let class = i / 50;
        let jitter = (i % 7) as f64 * 0.1;
        let base = class as f64 * 1.5;
        format!(
            "{},{:.1},{:.1},{:.1},{:.1},{}",
            i + 1,
            4.5 + base + jitter,
            3.0 + jitter / 2.0,
            1.0 + base * 1.8 + jitter,
            0.2 + base * 0.7 + jitter / 3.0,
            species[class]
        )
    });
    write_csv(
        "Id,SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm,Species",
        rows,
    )
}

/// 200 rows of advertising spend with `Sales` last
pub fn sales_csv() -> NamedTempFile {
    let rows = (0..200).map(|i| {
        let tv = (i * 37 % 300) as f64 + 0.5;
        let radio = (i * 13 % 50) as f64;
        let newspaper = (i * 29 % 100) as f64;
        let sales = 3.0 + 0.05 * tv + 0.2 * radio + (i % 5) as f64 * 0.1;
        format!("{:.1},{:.1},{:.1},{:.2}", tv, radio, newspaper, sales)
    });
    write_csv("TV,Radio,Newspaper,Sales", rows)
}

/// 60 rows of advertising spend with a text `Band` target last
pub fn banded_sales_csv() -> NamedTempFile {
    let rows = (0..60).map(|i| {
        let tv = (i * 37 % 300) as f64;
        let band = if tv > 150.0 { "high" } else { "low" };
        format!("{:.1},{:.1},{}", tv, (i * 13 % 50) as f64, band)
    });
    write_csv("TV,Radio,Band", rows)
}

/// 120 passengers with missing `Age`, `Embarked` and `Cabin` cells
pub fn titanic_csv() -> NamedTempFile {
    let ports = ["S", "C", "Q"];
    let rows = (0..120).map(|i| {
        let pclass = i % 3 + 1;
        let female = i % 2 == 0;
        let survived = u8::from((female && pclass < 3) || (!female && pclass == 1 && i % 4 == 1));
        let age = if i % 9 == 0 {
            String::new()
        } else {
            format!("{}", 5 + (i * 7) % 60)
        };
        let embarked = if i % 40 == 7 { "" } else { ports[i % 3] };
        let cabin = if pclass == 1 { format!("C{}", 80 + i) } else { String::new() };
        format!(
            "{},{},{},\"Passenger, {}\",{},{},{},{},A/5 {},{:.2},{},{}",
            i + 1,
            survived,
            pclass,
            i,
            if female { "female" } else { "male" },
            age,
            i % 3,
            i % 2,
            21170 + i,
            7.25 + (4 - pclass) as f64 * 20.0 + (i % 10) as f64,
            cabin,
            embarked
        )
    });
    write_csv(
        "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked",
        rows,
    )
}
