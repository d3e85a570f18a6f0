//! Locale-specific prompt texts.

use crate::locale::Locale;

const CATEGORIES_DE: &str = "\
Erstelle mindestens 40 Kategorien als JSON-Array (eine Zeile, keine Zusätze). Regeln:
1. genau ein Wort pro Kategorie (Komposita erlaubt),
2. keine inhaltlichen Überschneidungen,
3. Länge 6–30 Zeichen,
4. keine Wörter aus der Blacklist,
5. überwiegend allgemein, aber auch spezielle Begriffe (z. B. SpanischeKüche, Süßwasserfische, Deutschrap, bestimmter Film),
6. mindestens 2 ungewöhnliche/kuriose Kategorien,
7. nur allgemein bekannte Begriffe, keine Neuschöpfungen.
Beispiele (Blacklist): Früchte, Gemüse, Musikinstrumente, Ostern, Kaninchen, Computer, Architektur, Philosophie, Küchengeräte, GameOfThrones, Fischarten, Programmiersprachen, Automarken, Deutschrap, SpanischeKüche, Weltmusik";

const CATEGORIES_SV: &str = "\
Skapa minst 40 kategorier som en JSON-array (en rad, inga tillägg). Regler:
1. exakt ett ord per kategori (sammansättningar tillåtna),
2. inga innehållsliga överlapp,
3. längd 6–30 tecken,
4. inga ord från svartlistan,
5. mest allmänna men även specifika begrepp (t.ex. SpanskMat, Sötvattensfiskar, TyskRap, en viss film),
6. minst 2 ovanliga/knasiga kategorier,
7. endast allmänt kända begrepp, inga nyskapade ord.
Exempel (svartlista): frukter, grönsaker, musikinstrument, kaniner, datorer, arkitektur, filosofi, köksredskap, GameOfThrones, fiskarter, programmeringsspråk, bilmärken, tyskrap, spanskmat, världsmusik";

pub fn categories(locale: Locale) -> &'static str {
    match locale {
        Locale::De => CATEGORIES_DE,
        Locale::Sv => CATEGORIES_SV,
    }
}

pub fn theme(locale: Locale, category: &str) -> String {
    match locale {
        Locale::De => format!(
            "\
Formuliere eine rätselhafte Kurzbeschreibung zum Oberbegriff {category}.
Regeln:
1. Maximal 4 Wörter oder 30 Zeichen.
2. Keine Wortteile, Wortstämme oder Synonyme des Oberbegriffs.
3. Auf Deutsch, gern metaphorisch oder als Wortspiel.
4. Sie soll zum Knobeln anregen.
5. Gib nur die Beschreibung zurück – eine Zeile, ohne Anführungszeichen oder Zusatztext.
Beispiele:
- Musikinstrumente -> Klangquellen
- Süßwasserfische -> Am Haken!"
        ),
        Locale::Sv => format!(
            "\
Formulera en gåtfull kort beskrivning av överbegreppet {category}.
Regler:
1. Maximal 4 ord eller 30 tecken.
2. Inga orddelar, ordstammar eller synonymer till överbegreppet.
3. På svenska, gärna metaforiskt eller som ett ordspel.
4. Den ska få en att klura.
5. Ge endast beskrivningen - en rad, utan citattecken eller tilläggstext.
Exempel:
- Musikinstrument -> Ljudkällor
- Sötvattensfiskar -> På kroken!"
        ),
    }
}

pub fn word_pool(locale: Locale, category: &str) -> String {
    match locale {
        Locale::De => format!(
            "\
Nenne 10–30 Unterbegriffe zum Thema {category}.
Regeln:
1. Überwiegend geläufige Begriffe, die eine Durchschnittsperson kennt.
2. Ausnahmen: Bei Themen wie Automarken oder Programmiersprachen sind bekannte Marken- oder Fremdwörter erlaubt.
3. Meist ein Wort (Komposita erlaubt); wenige Ausnahmen mit max. 3 Wörtern.
4. Begriffe dürfen ähnlich, aber nicht identisch sein; Wiederholungen vermeiden.
5. Gib nur ein gültiges JSON-Array in einer Zeile zurück – ohne Zusatztext oder Codeblock.
6. Qualität vor Quantität: 10–15 gute Begriffe sind ausreichend, wenn mehr nicht sinnvoll sind.
7. Bevorzuge kurze Begriffe (4–8 Zeichen), wenn möglich.
Beispiel (Thema „Automarken“):
[\"Volkswagen\",\"Toyota\",\"Ford\", ...]"
        ),
        Locale::Sv => format!(
            "\
Nämn 10–30 underbegrepp till temat {category}.
Regler:
1. Mest vanliga begrepp som en genomsnittsperson känner till.
2. Undantag: För teman som Bilmärken eller Programmeringsspråk är kända varumärken eller utländska ord tillåtna.
3. Vanligen ett ord (sammansättningar tillåtna); några få får ha högst 3 ord.
4. Begrepp får vara liknande men inte identiska; undvik onödiga upprepningar.
5. Ge endast en giltig JSON-array på en rad – utan extra text eller kodblock.
6. Kvalitet före kvantitet: 10–15 bra begrepp räcker om fler inte är rimliga.
7. Föredra korta begrepp (4–8 tecken) när det är möjligt.
Exempel (tema ”Bilmärken”):
[\"Volkswagen\",\"Toyota\",\"Ford\", ...]"
        ),
    }
}
