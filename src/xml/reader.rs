//! Document reader.
//!
//! Parses the persisted vocabulary back into the Document Model. Unknown
//! elements are skipped whole, so documents carrying extra hand-added
//! structure still load. Docs children are captured raw, markup included.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::declarations::{MemberKind, RefKind, TypeKind};
use crate::frameworks::Membership;
use crate::index::{IndexDoc, IndexEntry};
use crate::model::{
    AssemblyInfoNode, DocBlock, ExceptionDoc, MemberDoc, ParameterNode, SignatureVariant,
    TrackedValues, TypeDoc, TypeForwardNode, TypeParamNode,
};
use crate::policy::ApiStyle;
use crate::xml::XmlError;

/// Parse one persisted type document.
pub fn read_type(xml: &str) -> Result<TypeDoc, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"Type" => {
                return read_type_element(&mut reader, &e);
            }
            Event::Eof => return Err(XmlError::Malformed("missing Type root element".into())),
            _ => {}
        }
    }
}

/// Parse the top-level index document.
pub fn read_index(xml: &str) -> Result<IndexDoc, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"Overview" => {
                return read_overview(&mut reader);
            }
            Event::Eof => return Err(XmlError::Malformed("missing Overview root element".into())),
            _ => {}
        }
    }
}

fn attr(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, XmlError> {
    for attribute in e.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == key.as_bytes() {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn require_attr(e: &BytesStart<'_>, key: &str) -> Result<String, XmlError> {
    attr(e, key)?.ok_or_else(|| {
        XmlError::Malformed(format!(
            "element `{}` is missing its `{key}` attribute",
            String::from_utf8_lossy(e.name().as_ref())
        ))
    })
}

fn membership_attr(e: &BytesStart<'_>) -> Result<Membership, XmlError> {
    Ok(Membership::decode(attr(e, "FrameworkAlternate")?.as_deref()))
}

/// Unescaped text content of a plain structural element.
fn read_element_text(reader: &mut Reader<&[u8]>, end: &[u8]) -> Result<String, XmlError> {
    let mut out = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => out.push_str(&t.unescape()?),
            Event::End(e) if e.name().as_ref() == end => break,
            Event::Eof => {
                return Err(XmlError::Malformed(format!(
                    "unexpected end of document inside `{}`",
                    String::from_utf8_lossy(end)
                )));
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Raw content of a docs element, markup included.
fn read_raw(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<String, XmlError> {
    Ok(reader.read_text(start.name())?.into_owned())
}

fn read_type_element(
    reader: &mut Reader<&[u8]>,
    root: &BytesStart<'_>,
) -> Result<TypeDoc, XmlError> {
    let full_name = require_attr(root, "FullName")?;
    let namespace = attr(root, "Namespace")?.unwrap_or_default();
    let kind_text = require_attr(root, "Kind")?;
    let kind = TypeKind::parse(&kind_text)
        .ok_or_else(|| XmlError::Malformed(format!("unknown type kind `{kind_text}`")))?;
    let mut doc = TypeDoc::new(&full_name, &namespace, kind);

    loop {
        match reader.read_event()? {
            Event::Empty(e) => {
                if e.name().as_ref() == b"TypeSignature" {
                    doc.signatures.push(read_signature(&e)?);
                }
            }
            Event::Start(e) => match e.name().as_ref() {
                b"AssemblyInfo" => doc.assemblies.push(read_assembly_info(reader, &e)?),
                b"TypeParameters" => read_type_params(reader, &mut doc.type_params)?,
                b"Base" => read_tracked(reader, b"Base", b"BaseTypeName", &mut doc.base)?,
                b"Interfaces" => read_interfaces(reader, &mut doc.interfaces)?,
                b"Attributes" => read_attribute_list(reader, &mut doc.attributes)?,
                b"TypeForwardingChain" => read_forwards(reader, &mut doc.forwards)?,
                b"Docs" => doc.docs = read_docs(reader)?,
                b"Members" => read_members(reader, &mut doc.members)?,
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"Type" => break,
            Event::Eof => {
                return Err(XmlError::Malformed("unexpected end of document".into()));
            }
            _ => {}
        }
    }
    Ok(doc)
}

fn read_signature(e: &BytesStart<'_>) -> Result<SignatureVariant, XmlError> {
    Ok(SignatureVariant {
        language: require_attr(e, "Language")?,
        value: require_attr(e, "Value")?,
        usage: attr(e, "Usage")?,
        frameworks: membership_attr(e)?,
    })
}

fn read_assembly_info(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<AssemblyInfoNode, XmlError> {
    let apistyle = match attr(start, "apistyle")? {
        Some(text) => Some(ApiStyle::parse(&text).ok_or_else(|| {
            XmlError::Malformed(format!("unknown apistyle `{text}`"))
        })?),
        None => None,
    };
    let mut node = AssemblyInfoNode {
        name: String::new(),
        versions: Vec::new(),
        apistyle,
    };
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"AssemblyName" => node.name = read_element_text(reader, b"AssemblyName")?,
                b"AssemblyVersion" => node
                    .versions
                    .push(read_element_text(reader, b"AssemblyVersion")?),
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"AssemblyInfo" => break,
            Event::Eof => {
                return Err(XmlError::Malformed("unterminated AssemblyInfo".into()));
            }
            _ => {}
        }
    }
    Ok(node)
}

fn read_type_params(
    reader: &mut Reader<&[u8]>,
    params: &mut Vec<TypeParamNode>,
) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Empty(e) if e.name().as_ref() == b"TypeParameter" => {
                params.push(TypeParamNode {
                    name: require_attr(&e, "Name")?,
                    constraints: Vec::new(),
                    frameworks: membership_attr(&e)?,
                });
            }
            Event::Start(e) if e.name().as_ref() == b"TypeParameter" => {
                let mut node = TypeParamNode {
                    name: require_attr(&e, "Name")?,
                    constraints: Vec::new(),
                    frameworks: membership_attr(&e)?,
                };
                loop {
                    match reader.read_event()? {
                        Event::Start(inner) if inner.name().as_ref() == b"BaseTypeName" => {
                            node.constraints
                                .push(read_element_text(reader, b"BaseTypeName")?);
                        }
                        Event::End(end) if end.name().as_ref() == b"TypeParameter" => break,
                        Event::Eof => {
                            return Err(XmlError::Malformed("unterminated TypeParameter".into()));
                        }
                        _ => {}
                    }
                }
                params.push(node);
            }
            Event::End(e) if e.name().as_ref() == b"TypeParameters" => break,
            Event::Eof => return Err(XmlError::Malformed("unterminated TypeParameters".into())),
            _ => {}
        }
    }
    Ok(())
}

fn read_tracked(
    reader: &mut Reader<&[u8]>,
    container: &[u8],
    item: &[u8],
    values: &mut TrackedValues,
) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == item => {
                let frameworks = membership_attr(&e)?;
                let value = read_element_text(reader, item)?;
                values.push_raw(value, frameworks);
            }
            Event::End(e) if e.name().as_ref() == container => break,
            Event::Eof => {
                return Err(XmlError::Malformed(format!(
                    "unterminated `{}`",
                    String::from_utf8_lossy(container)
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn read_interfaces(
    reader: &mut Reader<&[u8]>,
    interfaces: &mut TrackedValues,
) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"Interface" => {
                let frameworks = membership_attr(&e)?;
                let mut name = String::new();
                loop {
                    match reader.read_event()? {
                        Event::Start(inner) if inner.name().as_ref() == b"InterfaceName" => {
                            name = read_element_text(reader, b"InterfaceName")?;
                        }
                        Event::End(end) if end.name().as_ref() == b"Interface" => break,
                        Event::Eof => {
                            return Err(XmlError::Malformed("unterminated Interface".into()));
                        }
                        _ => {}
                    }
                }
                interfaces.push_raw(name, frameworks);
            }
            Event::End(e) if e.name().as_ref() == b"Interfaces" => break,
            Event::Eof => return Err(XmlError::Malformed("unterminated Interfaces".into())),
            _ => {}
        }
    }
    Ok(())
}

fn read_attribute_list(
    reader: &mut Reader<&[u8]>,
    attributes: &mut Vec<String>,
) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"AttributeName" => {
                attributes.push(read_element_text(reader, b"AttributeName")?);
            }
            Event::End(e) if e.name().as_ref() == b"Attributes" => break,
            Event::Eof => return Err(XmlError::Malformed("unterminated Attributes".into())),
            _ => {}
        }
    }
    Ok(())
}

fn read_forwards(
    reader: &mut Reader<&[u8]>,
    forwards: &mut Vec<TypeForwardNode>,
) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Empty(e) if e.name().as_ref() == b"TypeForwarding" => {
                forwards.push(TypeForwardNode {
                    from_assembly: require_attr(&e, "From")?,
                    from_version: require_attr(&e, "FromVersion")?,
                    to_assembly: require_attr(&e, "To")?,
                    to_version: require_attr(&e, "ToVersion")?,
                    frameworks: membership_attr(&e)?,
                });
            }
            Event::End(e) if e.name().as_ref() == b"TypeForwardingChain" => break,
            Event::Eof => {
                return Err(XmlError::Malformed("unterminated TypeForwardingChain".into()));
            }
            _ => {}
        }
    }
    Ok(())
}

fn read_docs(reader: &mut Reader<&[u8]>) -> Result<DocBlock, XmlError> {
    let mut docs = DocBlock::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"summary" => docs.summary = read_raw(reader, &e)?,
                b"param" => {
                    let name = require_attr(&e, "name")?;
                    let text = read_raw(reader, &e)?;
                    docs.params.insert(name, text);
                }
                b"typeparam" => {
                    let name = require_attr(&e, "name")?;
                    let text = read_raw(reader, &e)?;
                    docs.typeparams.insert(name, text);
                }
                b"returns" => docs.returns = Some(read_raw(reader, &e)?),
                b"value" => docs.value = Some(read_raw(reader, &e)?),
                b"remarks" => docs.remarks = Some(read_raw(reader, &e)?),
                b"exception" => {
                    let cref = require_attr(&e, "cref")?;
                    let text = read_raw(reader, &e)?;
                    docs.exceptions.push(ExceptionDoc { cref, text });
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"summary" => docs.summary = String::new(),
                b"param" => {
                    docs.params.insert(require_attr(&e, "name")?, String::new());
                }
                b"typeparam" => {
                    docs.typeparams
                        .insert(require_attr(&e, "name")?, String::new());
                }
                b"returns" => docs.returns = Some(String::new()),
                b"value" => docs.value = Some(String::new()),
                b"remarks" => docs.remarks = Some(String::new()),
                b"exception" => docs.exceptions.push(ExceptionDoc {
                    cref: require_attr(&e, "cref")?,
                    text: String::new(),
                }),
                b"altmember" => docs.altmembers.push(require_attr(&e, "cref")?),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Docs" => break,
            Event::Eof => return Err(XmlError::Malformed("unterminated Docs".into())),
            _ => {}
        }
    }
    Ok(docs)
}

fn read_members(reader: &mut Reader<&[u8]>, members: &mut Vec<MemberDoc>) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"Member" => {
                members.push(read_member(reader, &e)?);
            }
            Event::End(e) if e.name().as_ref() == b"Members" => break,
            Event::Eof => return Err(XmlError::Malformed("unterminated Members".into())),
            _ => {}
        }
    }
    Ok(())
}

fn read_member(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<MemberDoc, XmlError> {
    let name = require_attr(start, "MemberName")?;
    let mut node = MemberDoc::new(&name, MemberKind::Method);
    node.apistyle = match attr(start, "apistyle")? {
        Some(text) => Some(ApiStyle::parse(&text).ok_or_else(|| {
            XmlError::Malformed(format!("unknown apistyle `{text}`"))
        })?),
        None => None,
    };

    loop {
        match reader.read_event()? {
            Event::Empty(e) => {
                if e.name().as_ref() == b"MemberSignature" {
                    node.signatures.push(read_signature(&e)?);
                }
            }
            Event::Start(e) => match e.name().as_ref() {
                b"MemberType" => {
                    let text = read_element_text(reader, b"MemberType")?;
                    node.kind = MemberKind::parse(&text).ok_or_else(|| {
                        XmlError::Malformed(format!("unknown member kind `{text}`"))
                    })?;
                }
                b"Implements" => loop {
                    match reader.read_event()? {
                        Event::Start(inner) if inner.name().as_ref() == b"InterfaceMember" => {
                            node.implements
                                .push(read_element_text(reader, b"InterfaceMember")?);
                        }
                        Event::End(end) if end.name().as_ref() == b"Implements" => break,
                        Event::Eof => {
                            return Err(XmlError::Malformed("unterminated Implements".into()));
                        }
                        _ => {}
                    }
                },
                b"AssemblyInfo" => node.assemblies.push(read_assembly_info(reader, &e)?),
                b"Attributes" => read_attribute_list(reader, &mut node.attributes)?,
                b"TypeParameters" => read_type_params(reader, &mut node.type_params)?,
                b"Parameters" => read_parameters(reader, &mut node.parameters)?,
                b"ReturnValue" => {
                    read_tracked(reader, b"ReturnValue", b"ReturnType", &mut node.return_type)?;
                }
                b"Docs" => node.docs = read_docs(reader)?,
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"Member" => break,
            Event::Eof => return Err(XmlError::Malformed("unterminated Member".into())),
            _ => {}
        }
    }
    Ok(node)
}

fn read_parameters(
    reader: &mut Reader<&[u8]>,
    parameters: &mut Vec<ParameterNode>,
) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Empty(e) if e.name().as_ref() == b"Parameter" => {
                let index = match attr(&e, "Index")? {
                    Some(text) => Some(text.parse::<usize>().map_err(|_| {
                        XmlError::Malformed(format!("bad parameter index `{text}`"))
                    })?),
                    None => None,
                };
                parameters.push(ParameterNode {
                    name: require_attr(&e, "Name")?,
                    ty: require_attr(&e, "Type")?,
                    ref_kind: RefKind::parse(attr(&e, "RefType")?.as_deref()),
                    index,
                    frameworks: membership_attr(&e)?,
                });
            }
            Event::End(e) if e.name().as_ref() == b"Parameters" => break,
            Event::Eof => return Err(XmlError::Malformed("unterminated Parameters".into())),
            _ => {}
        }
    }
    Ok(())
}

fn read_overview(reader: &mut Reader<&[u8]>) -> Result<IndexDoc, XmlError> {
    let mut index = IndexDoc::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"Title" => index.title = read_element_text(reader, b"Title")?,
                b"Assemblies" => loop {
                    match reader.read_event()? {
                        Event::Empty(inner) if inner.name().as_ref() == b"Assembly" => {
                            let name = require_attr(&inner, "Name")?;
                            let version = require_attr(&inner, "Version")?;
                            index.record_assembly(&name, &version);
                        }
                        Event::End(end) if end.name().as_ref() == b"Assemblies" => break,
                        Event::Eof => {
                            return Err(XmlError::Malformed("unterminated Assemblies".into()));
                        }
                        _ => {}
                    }
                },
                b"Types" => read_index_types(reader, &mut index)?,
                b"ExtensionMethods" => loop {
                    match reader.read_event()? {
                        Event::Empty(inner) if inner.name().as_ref() == b"ExtensionMethod" => {
                            let host = require_attr(&inner, "Host")?;
                            let member = require_attr(&inner, "Member")?;
                            index.record_extension_method(&host, &member);
                        }
                        Event::End(end) if end.name().as_ref() == b"ExtensionMethods" => break,
                        Event::Eof => {
                            return Err(XmlError::Malformed(
                                "unterminated ExtensionMethods".into(),
                            ));
                        }
                        _ => {}
                    }
                },
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"Overview" => break,
            Event::Eof => return Err(XmlError::Malformed("unterminated Overview".into())),
            _ => {}
        }
    }
    Ok(index)
}

fn read_index_types(reader: &mut Reader<&[u8]>, index: &mut IndexDoc) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"Namespace" => {
                let namespace = require_attr(&e, "Name")?;
                let entries = index.namespaces.entry(namespace).or_default();
                loop {
                    match reader.read_event()? {
                        Event::Empty(inner) if inner.name().as_ref() == b"Type" => {
                            let name = require_attr(&inner, "Name")?;
                            let kind_text = require_attr(&inner, "Kind")?;
                            let kind = TypeKind::parse(&kind_text).ok_or_else(|| {
                                XmlError::Malformed(format!("unknown type kind `{kind_text}`"))
                            })?;
                            entries.push(IndexEntry { name, kind });
                        }
                        Event::End(end) if end.name().as_ref() == b"Namespace" => break,
                        Event::Eof => {
                            return Err(XmlError::Malformed("unterminated Namespace".into()));
                        }
                        _ => {}
                    }
                }
            }
            Event::End(e) if e.name().as_ref() == b"Types" => break,
            Event::Eof => return Err(XmlError::Malformed("unterminated Types".into())),
            _ => {}
        }
    }
    Ok(())
}
