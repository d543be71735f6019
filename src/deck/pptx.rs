//! Office Open XML presentation writer
//!
//! Emits the smallest package PowerPoint and LibreOffice accept: one master,
//! one blank layout, a theme, and one part per slide. Every shape is a text
//! box with an explicit position so nothing depends on placeholders.

use super::model::{is_xml_char, Bullet, Slide, SlideDeck};
use super::{DeckError, DeckRenderer};
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument";

/// 4:3 slide in EMU
const SLIDE_WIDTH: u64 = 9_144_000;
const SLIDE_HEIGHT: u64 = 6_858_000;

const TITLE_SIZE: u32 = 44;
const SUBTITLE_SIZE: u32 = 24;
const HEADING_SIZE: u32 = 36;
const BODY_SIZE: u32 = 18;

/// Placement of a text box, EMU
#[derive(Clone, Copy)]
struct Frame {
    x: u64,
    y: u64,
    cx: u64,
    cy: u64,
}

const TITLE_FRAME: Frame = Frame { x: 685_800, y: 2_130_425, cx: 7_772_400, cy: 1_470_025 };
const SUBTITLE_FRAME: Frame = Frame { x: 1_371_600, y: 3_886_200, cx: 6_400_800, cy: 1_752_600 };
const HEADING_FRAME: Frame = Frame { x: 457_200, y: 274_638, cx: 8_229_600, cy: 1_143_000 };
const BODY_FRAME: Frame = Frame { x: 457_200, y: 1_600_200, cx: 8_229_600, cy: 4_525_963 };

/// Renders a [`SlideDeck`] as a `.pptx` package
#[derive(Debug, Default, Clone, Copy)]
pub struct PptxRenderer;

impl DeckRenderer for PptxRenderer {
    fn render(&self, deck: &SlideDeck) -> Result<Vec<u8>, DeckError> {
        check_text(deck)?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let count = deck.slides.len();
        let mut parts: Vec<(String, String)> = vec![
            ("[Content_Types].xml".to_string(), content_types(count)),
            ("_rels/.rels".to_string(), root_rels()),
            ("ppt/presentation.xml".to_string(), presentation(count)),
            (
                "ppt/_rels/presentation.xml.rels".to_string(),
                presentation_rels(count),
            ),
            (
                "ppt/slideMasters/slideMaster1.xml".to_string(),
                SLIDE_MASTER.replace("{ns}", &namespaces()),
            ),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
                rels(&[
                    ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                    ("rId2", "theme", "../theme/theme1.xml"),
                ]),
            ),
            (
                "ppt/slideLayouts/slideLayout1.xml".to_string(),
                SLIDE_LAYOUT.replace("{ns}", &namespaces()),
            ),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
                rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
            ),
            ("ppt/theme/theme1.xml".to_string(), THEME.replace("{a}", NS_A)),
        ];
        for (i, slide) in deck.slides.iter().enumerate() {
            let n = i + 1;
            parts.push((format!("ppt/slides/slide{n}.xml"), slide_xml(slide)));
            parts.push((
                format!("ppt/slides/_rels/slide{n}.xml.rels"),
                rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            ));
        }

        for (name, body) in parts {
            zip.start_file(name, options)?;
            zip.write_all(body.as_bytes())?;
        }
        Ok(zip.finish()?.into_inner())
    }
}

fn check_text(deck: &SlideDeck) -> Result<(), DeckError> {
    let texts = deck.slides.iter().flat_map(|slide| -> Vec<&str> {
        match slide {
            Slide::Title { title, subtitle } => vec![title.as_str(), subtitle.as_str()],
            Slide::Bullets { title, bullets } => std::iter::once(title.as_str())
                .chain(bullets.iter().map(|b| b.text.as_str()))
                .collect(),
            Slide::Text { title, body } => vec![title.as_str(), body.as_str()],
        }
    });
    for text in texts {
        if let Some(c) = text.chars().find(|c| !is_xml_char(*c)) {
            return Err(DeckError::InvalidText(format!(
                "character U+{:04X} cannot be stored in a slide",
                u32::from(c)
            )));
        }
    }
    Ok(())
}

fn namespaces() -> String {
    format!(r#"xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}""#)
}

fn content_types(slide_count: usize) -> String {
    let mut xml = format!(
        r#"{XML_HEADER}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="{CT_BASE}.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{CT_BASE}.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="{CT_BASE}.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="{CT_BASE}.theme+xml"/>"#
    );
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{CT_BASE}.presentationml.slide+xml"/>"#
        );
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels() -> String {
    rels(&[("rId1", "officeDocument", "ppt/presentation.xml")])
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(
        r#"{XML_HEADER}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#
    );
    for (id, kind, target) in entries {
        let _ = write!(
            xml,
            r#"<Relationship Id="{id}" Type="{REL_BASE}/{kind}" Target="{target}"/>"#
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// Slides take relationship ids after the master and theme
fn slide_rel_id(n: usize) -> String {
    format!("rId{}", n + 2)
}

fn presentation(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for n in 1..=slide_count {
        let _ = write!(
            slide_ids,
            r#"<p:sldId id="{}" r:id="{}"/>"#,
            255 + n,
            slide_rel_id(n)
        );
    }
    format!(
        r#"{XML_HEADER}<p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="{SLIDE_WIDTH}" cy="{SLIDE_HEIGHT}" type="screen4x3"/><p:notesSz cx="{SLIDE_HEIGHT}" cy="{SLIDE_WIDTH}"/></p:presentation>"#,
        namespaces()
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let targets: Vec<(String, String)> = (1..=slide_count)
        .map(|n| (slide_rel_id(n), format!("slides/slide{n}.xml")))
        .collect();
    let mut entries = vec![
        ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        ("rId2", "theme", "theme/theme1.xml"),
    ];
    entries.extend(
        targets
            .iter()
            .map(|(id, target)| (id.as_str(), "slide", target.as_str())),
    );
    rels(&entries)
}

fn slide_xml(slide: &Slide) -> String {
    let shapes = match slide {
        Slide::Title { title, subtitle } => [
            text_box(2, "Title", TITLE_FRAME, &paragraph(title, TITLE_SIZE, true)),
            text_box(3, "Subtitle", SUBTITLE_FRAME, &paragraph(subtitle, SUBTITLE_SIZE, false)),
        ]
        .concat(),
        Slide::Bullets { title, bullets } => {
            let body = if bullets.is_empty() {
                "<a:p/>".to_string()
            } else {
                bullets.iter().map(bullet_paragraph).collect()
            };
            [
                text_box(2, "Title", HEADING_FRAME, &paragraph(title, HEADING_SIZE, true)),
                text_box(3, "Content", BODY_FRAME, &body),
            ]
            .concat()
        }
        Slide::Text { title, body } => {
            let paragraphs: String = body
                .lines()
                .map(|line| paragraph(line, BODY_SIZE, false))
                .collect();
            let paragraphs = if paragraphs.is_empty() {
                "<a:p/>".to_string()
            } else {
                paragraphs
            };
            [
                text_box(2, "Title", HEADING_FRAME, &paragraph(title, HEADING_SIZE, true)),
                text_box(3, "Content", BODY_FRAME, &paragraphs),
            ]
            .concat()
        }
    };

    format!(
        r#"{XML_HEADER}<p:sld {}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        namespaces()
    )
}

fn text_box(id: u32, name: &str, frame: Frame, paragraphs: &str) -> String {
    let Frame { x, y, cx, cy } = frame;
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square"><a:normAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#
    )
}

fn paragraph(text: &str, size_pt: u32, bold: bool) -> String {
    if text.is_empty() {
        return "<a:p/>".to_string();
    }
    let b = u8::from(bold);
    format!(
        r#"<a:p><a:r><a:rPr lang="en-US" sz="{}" b="{b}" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
        size_pt * 100,
        escape(text)
    )
}

fn bullet_paragraph(bullet: &Bullet) -> String {
    format!(
        r#"<a:p><a:pPr marL="342900" lvl="{}" indent="-342900"><a:buChar char="•"/></a:pPr><a:r><a:rPr lang="en-US" sz="{}" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
        bullet.level,
        bullet.font_size_pt * 100,
        escape(&bullet.text)
    )
}

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {ns}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {ns} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="{a}" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;
